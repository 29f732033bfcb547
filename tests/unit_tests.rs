use tosho_mangaplus::prelude::*;
use tosho_mangaplus::{SOURCE_ID, SourceConfigBuilder, crypto};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_metadata() {
        let source = MangaPlusSource::new();

        assert_eq!(source.id(), SOURCE_ID);
        assert_eq!(source.id(), "mangaplus");
        assert_eq!(source.name(), "MANGA Plus");
        assert!(source.base_url().starts_with("https://"));
        assert!(!source.base_url().ends_with('/'));
    }

    #[test]
    fn test_source_config_builder() {
        let config = SourceConfigBuilder::default()
            .api_base("https://api.example.com/api")
            .site_url("https://example.com")
            .result_limit(3usize)
            .max_retries(1u32)
            .user_agent("TestAgent/1.0")
            .build()
            .unwrap();

        let source = MangaPlusSource::with_config(config);
        assert_eq!(source.config().result_limit, 3);
        assert_eq!(source.config().max_retries, 1);
        assert_eq!(source.base_url(), "https://example.com");
    }

    #[test]
    fn test_candidate_struct() {
        let candidate = SeriesCandidate::new(
            "100020",
            "One Piece",
            Some("https://example.com/cover.jpg".to_string()),
        );

        assert_eq!(candidate.identifier, "100020");
        assert_eq!(candidate.name, "One Piece");
        assert!(candidate.cover_url.is_some());
        assert!(candidate.rank.is_none());

        let ranked = candidate.with_rank(2);
        assert_eq!(ranked.rank, Some(2));
        assert_eq!(ranked.identifier, candidate.identifier);
    }

    #[test]
    fn test_chapter_entry_serializes_slot_lowercase() {
        let chapter = ChapterEntry {
            identifier: "1000486".to_string(),
            number: "1".to_string(),
            title: "Romance Dawn".to_string(),
            description: String::new(),
            group: None,
            variant: Some(ChapterSlot::Last),
            created_at: None,
            updated_at: None,
            published_at: None,
        };

        let json = serde_json::to_value(&chapter).unwrap();
        assert_eq!(json["variant"], "last");
        assert_eq!(json["identifier"], "1000486");
    }

    #[test]
    fn test_image_tier_query_values() {
        assert_eq!(ImageTier::High.as_query(), "high");
        assert_eq!(ImageTier::Low.as_query(), "low");
    }

    #[test]
    fn test_descriptor_base64_decryption() {
        let page = PageDescriptor {
            index: 4,
            high: PageImage {
                url: "https://example.com/high/0005.jpg".to_string(),
                encryption_key: Some("ff".to_string()),
            },
            low: PageImage {
                url: "https://example.com/low/0005.jpg".to_string(),
                encryption_key: None,
            },
        };

        // [0x01, 0x02, 0x03] -> [0xFE, 0xFD, 0xFC]
        assert_eq!(page.decrypt_base64(ImageTier::High, "AQID").unwrap(), "/v38");
        assert_eq!(page.decrypt_base64(ImageTier::Low, "AQID").unwrap(), "AQID");
    }

    #[test]
    fn test_decryption_is_self_inverse() {
        let plain = b"\xFF\xD8\xFF\xE0 JFIF header and some image data".to_vec();
        let key = "8c3f0e21d5a7";

        let scrambled = crypto::decrypt_bytes(&plain, key).unwrap();
        assert_ne!(scrambled, plain);
        assert_eq!(crypto::decrypt_bytes(&scrambled, key).unwrap(), plain);
    }
}
