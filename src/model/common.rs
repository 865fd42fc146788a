use uuid::Uuid;

pub type Id = String;

/// Root under which every catalog record is addressed.
pub const CATALOG_ROOT: &str = "/catalog";

pub fn generate_id() -> Id {
    Uuid::new_v4().to_string()
}

/// Canonical URL of a catalog record, e.g. `/catalog/item/{id}`.
pub fn record_url(kind: &str, id: &Id) -> String {
    format!("{}/{}/{}", CATALOG_ROOT, kind, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(generate_id(), generate_id());
    }

    #[test]
    fn test_record_url() {
        assert_eq!(
            record_url("category", &"abc".to_string()),
            "/catalog/category/abc"
        );
    }
}
