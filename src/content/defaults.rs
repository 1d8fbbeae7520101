use super::{
    ImageSetting, Localized, LocalizedDocument, PersonalInfo, Settings, Skills,
    ThemeColorsSetting, ThemeSetting,
};

/// Placeholder document used whenever the configured source cannot be loaded.
pub fn default_document() -> LocalizedDocument {
    LocalizedDocument {
        personal_info: Localized::new(
            PersonalInfo {
                name: "Your Name".to_string(),
                title: "Your Professional Title".to_string(),
                email: "your.email@example.com".to_string(),
                phone: "+1 234 567 8900".to_string(),
                location: "Your City, Country".to_string(),
                website: "https://yourwebsite.com".to_string(),
                linkedin: "https://linkedin.com/in/yourprofile".to_string(),
                github: "https://github.com/yourusername".to_string(),
                summary: "Your professional summary goes here. Describe your experience, skills, and career objectives.".to_string(),
            },
            PersonalInfo {
                name: "اسمك".to_string(),
                title: "مسماك الوظيفي".to_string(),
                email: "your.email@example.com".to_string(),
                phone: "+1 234 567 8900".to_string(),
                location: "مدينتك، بلدك".to_string(),
                website: "https://yourwebsite.com".to_string(),
                linkedin: "https://linkedin.com/in/yourprofile".to_string(),
                github: "https://github.com/yourusername".to_string(),
                summary: "ملخصك المهني يأتي هنا. اوصف خبرتك ومهاراتك وأهدافك المهنية.".to_string(),
            },
        ),
        experience: Localized::new(Vec::new(), Vec::new()),
        education: Localized::new(Vec::new(), Vec::new()),
        skills: Localized::new(Skills::default(), Skills::default()),
        projects: Localized::new(Vec::new(), Vec::new()),
        languages: Localized::new(Vec::new(), Vec::new()),
        interests: Localized::new(Vec::new(), Vec::new()),
        settings: Settings {
            profile_image: ImageSetting::default(),
            qr_code: ImageSetting::default(),
            theme: ThemeSetting {
                default: "light".to_string(),
                colors: ThemeColorsSetting {
                    primary: "#2563eb".to_string(),
                },
            },
        },
    }
}
