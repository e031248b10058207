use super::ApiError;

/// Blog ids are UUIDs; anything else is rejected before touching the store.
pub fn validate_blog_id(id: &str) -> Result<String, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::validation("Blog id cannot be empty"));
    }

    uuid::Uuid::parse_str(id)
        .map(|uuid| uuid.to_string())
        .map_err(|_| ApiError::validation(format!("Invalid blog id: {id}")))
}

/// Slugs are lowercase ASCII words joined by single hyphens.
pub fn validate_slug(slug: &str) -> Result<&str, ApiError> {
    let valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if valid {
        Ok(slug)
    } else {
        Err(ApiError::not_found("Blog not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_blog_id() {
        let id = uuid::Uuid::now_v7().to_string();
        assert_eq!(validate_blog_id(&id).unwrap(), id);
        assert_eq!(validate_blog_id(&format!(" {id} ")).unwrap(), id);

        assert!(validate_blog_id("").is_err());
        assert!(validate_blog_id("not-a-uuid").is_err());
        assert!(validate_blog_id("123").is_err());
    }

    #[test]
    fn test_validate_blog_id_normalizes_case() {
        let id = uuid::Uuid::now_v7().to_string();
        assert_eq!(validate_blog_id(&id.to_uppercase()).unwrap(), id);
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("hello-world").is_ok());
        assert!(validate_slug("rust-2024").is_ok());

        assert!(validate_slug("").is_err());
        assert!(validate_slug("Hello").is_err());
        assert!(validate_slug("-hello").is_err());
        assert!(validate_slug("a--b").is_err());
        assert!(validate_slug("a b").is_err());
    }
}
