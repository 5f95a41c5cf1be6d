//! Rule behavior on real decks

mod common;

use std::sync::Arc;

use chrono::Months;
use common::*;
use onepager_ooxml::test_utils::{theme_xml, PptxBuilder, SlideFixture};
use onepager_validate::rules::{
    all_rules, AgeRule, FileNameRule, LanguageRule, PhotoRule, TemplateRule, TemplateThemes,
};
use onepager_validate::{Settings, ValidationError, ValidationRule};

const NAME_DE: &str = "Mustermann, Max_DE_240901.pptx";

fn months_ago(months: u32) -> chrono::DateTime<chrono::Utc> {
    now().checked_sub_months(Months::new(months)).unwrap()
}

fn template() -> Arc<TemplateThemes> {
    let bytes = PptxBuilder::new()
        .theme(theme_xml("OnePager"))
        .slide(&["Vorlage"])
        .build();
    Arc::new(TemplateThemes::new(bytes))
}

mod age {
    use super::*;

    #[tokio::test]
    async fn seven_months_old_is_flagged() {
        let ctx = context(NAME_DE, months_ago(7), compliant_deck());
        assert_eq!(
            AgeRule.validate(&ctx).await.unwrap(),
            vec![ValidationError::OlderThanSixMonths]
        );
    }

    #[tokio::test]
    async fn three_months_old_is_fine() {
        let ctx = context(NAME_DE, months_ago(3), compliant_deck());
        assert!(AgeRule.validate(&ctx).await.unwrap().is_empty());
    }
}

mod language {
    use super::*;

    #[tokio::test]
    async fn german_name_with_english_content() {
        let ctx = context(
            NAME_DE,
            months_ago(1),
            PptxBuilder::new().slide(&ENGLISH),
        );
        assert_eq!(
            LanguageRule.validate(&ctx).await.unwrap(),
            vec![ValidationError::WrongLanguageContent]
        );
    }

    #[tokio::test]
    async fn matching_language() {
        let ctx = context(NAME_DE, months_ago(1), PptxBuilder::new().slide(&GERMAN));
        assert!(LanguageRule.validate(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mixed_languages() {
        let ctx = context(
            NAME_DE,
            months_ago(1),
            PptxBuilder::new().slide(&GERMAN).slide(&ENGLISH),
        );
        assert_eq!(
            LanguageRule.validate(&ctx).await.unwrap(),
            vec![ValidationError::MixedLanguageVersion]
        );
    }

    #[tokio::test]
    async fn name_without_indicator() {
        let ctx = context("Profil.pptx", months_ago(1), PptxBuilder::new().slide(&GERMAN));
        assert_eq!(
            LanguageRule.validate(&ctx).await.unwrap(),
            vec![ValidationError::MissingLanguageIndicatorInName]
        );
    }

    #[tokio::test]
    async fn short_slides_are_not_judged() {
        let ctx = context(
            NAME_DE,
            months_ago(1),
            PptxBuilder::new().slide(&["Work on the platform", "Skills"]),
        );
        assert!(LanguageRule.validate(&ctx).await.unwrap().is_empty());
    }
}

mod template {
    use super::*;

    #[tokio::test]
    async fn template_theme_is_conform() {
        let rule = TemplateRule::new(template());
        let ctx = context(NAME_DE, months_ago(1), PptxBuilder::new().slide(&GERMAN));
        assert!(rule.validate(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn same_name_different_content_is_modified() {
        let rule = TemplateRule::new(template());
        let altered = theme_xml("OnePager").replace("000000", "1F3864");
        let ctx = context(
            NAME_DE,
            months_ago(1),
            PptxBuilder::new().theme(altered).slide(&GERMAN),
        );
        assert_eq!(
            rule.validate(&ctx).await.unwrap(),
            vec![ValidationError::UsingModifiedTemplate]
        );
    }

    #[tokio::test]
    async fn foreign_theme_is_unknown() {
        let rule = TemplateRule::new(template());
        let ctx = context(
            NAME_DE,
            months_ago(1),
            PptxBuilder::new().theme(theme_xml("Office Theme")).slide(&GERMAN),
        );
        assert_eq!(
            rule.validate(&ctx).await.unwrap(),
            vec![ValidationError::UsingUnknownTemplate]
        );
    }

    #[tokio::test]
    async fn only_one_pager_themes_count() {
        let rule = TemplateRule::new(template());
        let ctx = context(
            NAME_DE,
            months_ago(1),
            PptxBuilder::new()
                .theme(theme_xml("OnePager"))
                .theme(theme_xml("Office Theme"))
                .slide_with(SlideFixture::new(&GERMAN).theme(0))
                .slide_with(SlideFixture::new(&["Anhang"]).theme(1)),
        );
        assert!(rule.validate(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn without_one_pagers_all_slides_are_checked() {
        let rule = TemplateRule::new(template());
        let ctx = context(
            NAME_DE,
            months_ago(1),
            PptxBuilder::new()
                .theme(theme_xml("Office Theme"))
                .slide(&["Titel"]),
        );
        assert_eq!(
            rule.validate(&ctx).await.unwrap(),
            vec![ValidationError::UsingUnknownTemplate]
        );
    }
}

mod photo {
    use super::*;

    fn rule() -> PhotoRule {
        PhotoRule::new(Arc::new(MarkerScorer))
    }

    #[tokio::test]
    async fn good_photo_passes() {
        let ctx = context(NAME_DE, months_ago(1), compliant_deck());
        assert!(rule().validate(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn poor_photo_is_low_quality() {
        let ctx = context(
            NAME_DE,
            months_ago(1),
            PptxBuilder::new()
                .slide_with(one_pager(GERMAN, "photo.png"))
                .media("photo.png", b"face-poor".to_vec()),
        );
        assert_eq!(
            rule().validate(&ctx).await.unwrap(),
            vec![ValidationError::LowQualityPhoto]
        );
    }

    #[tokio::test]
    async fn no_images_is_missing_photo() {
        let ctx = context(NAME_DE, months_ago(1), PptxBuilder::new().slide(&GERMAN));
        assert_eq!(
            rule().validate(&ctx).await.unwrap(),
            vec![ValidationError::MissingPhoto]
        );
    }

    #[tokio::test]
    async fn logo_next_to_photo_is_other_image() {
        let ctx = context(
            NAME_DE,
            months_ago(1),
            PptxBuilder::new()
                .slide_with(one_pager(GERMAN, "photo.png").image("logo.png"))
                .media("photo.png", b"face-good".to_vec())
                .media("logo.png", b"logo".to_vec()),
        );
        assert_eq!(
            rule().validate(&ctx).await.unwrap(),
            vec![ValidationError::OtherImages]
        );
    }

    #[tokio::test]
    async fn unreadable_image_counts_as_without_face() {
        let ctx = context(
            NAME_DE,
            months_ago(1),
            PptxBuilder::new()
                .slide_with(one_pager(GERMAN, "photo.png"))
                .media("photo.png", b"broken".to_vec()),
        );
        assert_eq!(
            rule().validate(&ctx).await.unwrap(),
            vec![ValidationError::MissingPhoto, ValidationError::OtherImages]
        );
    }

    #[tokio::test]
    async fn non_numeric_labels_count_as_without_face() {
        let ctx = context(
            NAME_DE,
            months_ago(1),
            PptxBuilder::new()
                .slide_with(one_pager(GERMAN, "photo.png"))
                .media("photo.png", b"face-nan".to_vec()),
        );
        assert_eq!(
            rule().validate(&ctx).await.unwrap(),
            vec![ValidationError::MissingPhoto, ValidationError::OtherImages]
        );
    }

    #[tokio::test]
    async fn images_outside_one_pagers_are_ignored() {
        let ctx = context(
            NAME_DE,
            months_ago(1),
            compliant_deck()
                .slide_with(SlideFixture::new(&["Anhang"]).image("logo.png"))
                .media("logo.png", b"logo".to_vec()),
        );
        assert!(rule().validate(&ctx).await.unwrap().is_empty());
    }
}

mod file_name {
    use super::*;

    #[tokio::test]
    async fn conventional_name_passes() {
        let ctx = context(NAME_DE, months_ago(1), compliant_deck());
        assert!(FileNameRule.validate(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn free_name_is_flagged() {
        let ctx = context("OnePager final v2.pptx", months_ago(1), compliant_deck());
        assert_eq!(
            FileNameRule.validate(&ctx).await.unwrap(),
            vec![ValidationError::WrongFileName]
        );
    }
}

mod rule_set {
    use super::*;

    #[tokio::test]
    async fn compliant_document_has_no_findings() {
        let rules = all_rules(&Settings::default(), template(), Some(Arc::new(MarkerScorer)));
        let ctx = context(NAME_DE, months_ago(1), compliant_deck());
        assert!(rules.validate(&ctx).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn findings_follow_rule_order() {
        let mut settings = Settings::default();
        settings.rules.file_name = true;
        let rules = all_rules(&settings, template(), Some(Arc::new(MarkerScorer)));

        let ctx = context(
            "profil.pptx",
            months_ago(8),
            PptxBuilder::new()
                .theme(theme_xml("Office Theme"))
                .slide(&ENGLISH),
        );
        assert_eq!(
            rules.validate(&ctx).await.unwrap(),
            vec![
                ValidationError::OlderThanSixMonths,
                ValidationError::MissingLanguageIndicatorInName,
                ValidationError::UsingUnknownTemplate,
                ValidationError::MissingPhoto,
                ValidationError::WrongFileName,
            ]
        );
    }

    #[tokio::test]
    async fn corrupt_template_fails_evaluation() {
        let rules = all_rules(
            &Settings::default(),
            Arc::new(TemplateThemes::new(b"not a zip".to_vec())),
            None,
        );
        let ctx = context(NAME_DE, months_ago(1), compliant_deck());
        assert!(rules.validate(&ctx).await.is_err());
    }
}
