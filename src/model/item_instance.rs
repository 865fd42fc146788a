use crate::model::{generate_id, record_url, Id, Item};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Physical condition of a stocked unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    New,
    Used,
    Refurbished,
    #[serde(rename = "Open-box")]
    OpenBox,
    #[serde(rename = "Out of stock")]
    OutOfStock,
}

impl Condition {
    pub const ALL: [Condition; 5] = [
        Condition::New,
        Condition::Used,
        Condition::Refurbished,
        Condition::OpenBox,
        Condition::OutOfStock,
    ];

    /// Conditions that count as sellable stock on the landing view
    pub const AVAILABLE: [Condition; 4] = [
        Condition::New,
        Condition::Used,
        Condition::Refurbished,
        Condition::OpenBox,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::Used => "Used",
            Condition::Refurbished => "Refurbished",
            Condition::OpenBox => "Open-box",
            Condition::OutOfStock => "Out of stock",
        }
    }

    pub fn is_available(&self) -> bool {
        Self::AVAILABLE.contains(self)
    }
}

impl Default for Condition {
    fn default() -> Self {
        Condition::New
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Condition::ALL
            .into_iter()
            .find(|condition| condition.as_str() == s)
            .ok_or_else(|| format!("Unknown condition: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInstance {
    pub id: Id,
    /// Id of the catalog item this unit belongs to
    pub item: Id,
    pub condition: Condition,
    pub price: Decimal,
}

impl ItemInstance {
    pub fn new(new_instance: NewItemInstance) -> Self {
        Self::new_with_id(generate_id(), new_instance)
    }

    pub fn new_with_id(id: Id, new_instance: NewItemInstance) -> Self {
        Self {
            id,
            item: new_instance.item,
            condition: new_instance.condition,
            price: new_instance.price,
        }
    }

    pub fn url(&self) -> String {
        record_url("iteminstance", &self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItemInstance {
    pub item: Id,
    pub condition: Condition,
    pub price: Decimal,
}

/// An instance with its item reference resolved. `item` is `None` when the
/// referenced item has been removed underneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulatedItemInstance {
    pub instance: ItemInstance,
    pub item: Option<Item>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_parsing() {
        assert_eq!("Open-box".parse::<Condition>(), Ok(Condition::OpenBox));
        assert_eq!("Out of stock".parse::<Condition>(), Ok(Condition::OutOfStock));
        assert!("open-box".parse::<Condition>().is_err());
        assert!("In stock".parse::<Condition>().is_err());
    }

    #[test]
    fn test_condition_availability() {
        assert!(Condition::Refurbished.is_available());
        assert!(!Condition::OutOfStock.is_available());
        assert_eq!(Condition::default(), Condition::New);
    }

    #[test]
    fn test_condition_serializes_with_display_name() {
        let json = serde_json::to_string(&Condition::OpenBox).unwrap();
        assert_eq!(json, "\"Open-box\"");
    }
}
