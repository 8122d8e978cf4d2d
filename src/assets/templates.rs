/// A named meme template image. Fetching the URL is the caller's job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct MemeTemplate {
    pub name: &'static str,
    pub url: &'static str,
}

/// Built-in template catalog. The first entry is the default image.
pub const TEMPLATES: &[MemeTemplate] = &[
    MemeTemplate {
        name: "Two Buttons",
        url: "https://i.imgflip.com/1g8my4.jpg",
    },
    MemeTemplate {
        name: "Drake Hotline",
        url: "https://i.imgflip.com/30b1gx.jpg",
    },
    MemeTemplate {
        name: "Distracted BF",
        url: "https://i.imgflip.com/1ur9b0.jpg",
    },
    MemeTemplate {
        name: "Change My Mind",
        url: "https://i.imgflip.com/24y43o.jpg",
    },
    MemeTemplate {
        name: "Exit Ramp",
        url: "https://i.imgflip.com/22bdq6.jpg",
    },
];

pub fn default_template() -> &'static MemeTemplate {
    &TEMPLATES[0]
}

/// Case-insensitive lookup by name.
pub fn find_template(name: &str) -> Option<&'static MemeTemplate> {
    TEMPLATES.iter().find(|t| t.name.eq_ignore_ascii_case(name.trim()))
}
