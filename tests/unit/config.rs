use std::ffi::OsString;

use super::*;

#[test]
fn defaults_match_the_overlays() {
    let s = ForgeSettings::default();
    assert_eq!(s.meme.daily_limit, 3);
    assert_eq!(s.meme.export_name, "meme-forge-export.png");
    assert_eq!(s.sticker.export_name, "custom-sticker.png");
    assert_eq!(s.sticker.tolerance, 30.0);
    assert_eq!(s.sticker.outline_width, 5);
    assert_eq!(s.sticker.export_scale, 2);
    assert!(s.validate().is_ok());
}

#[test]
fn partial_json_fills_defaults() {
    let s: ForgeSettings =
        serde_json::from_str(r#"{ "sticker": { "tolerance": 12.5 }, "meme": { "daily_limit": 5 } }"#)
            .unwrap();
    assert_eq!(s.sticker.tolerance, 12.5);
    assert_eq!(s.sticker.outline_width, 5);
    assert_eq!(s.meme.daily_limit, 5);
    assert_eq!(s.meme.caption, CaptionStyle::default());
}

#[test]
fn env_overrides_paths() {
    let mut s = ForgeSettings::default();
    s.apply_env(|key| match key {
        ENV_FONT => Some(OsString::from("/fonts/Anton.ttf")),
        ENV_QUOTA_PATH => Some(OsString::from("")),
        _ => None,
    });
    assert_eq!(s.font_path, Some(PathBuf::from("/fonts/Anton.ttf")));
    // Empty values are ignored.
    assert_eq!(s.quota_path, PathBuf::from("meme_gen_limit.json"));
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = ForgeSettings::default();
    s.sticker.tolerance = -1.0;
    assert!(s.validate().is_err());

    let mut s = ForgeSettings::default();
    s.meme.daily_limit = 0;
    assert!(s.validate().is_err());

    let mut s = ForgeSettings::default();
    s.sticker.export_scale = 0;
    assert!(s.validate().is_err());
}

#[test]
fn load_reads_file() {
    let dir = PathBuf::from("target").join("config_load");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("forge.json");
    std::fs::write(&path, r#"{ "quota_path": "state/q.json" }"#).unwrap();

    let s = ForgeSettings::load(Some(&path)).unwrap();
    assert!(s.quota_path.ends_with("q.json"));

    assert!(ForgeSettings::load(Some(&dir.join("missing.json"))).is_err());
}

#[test]
fn sticker_outline_mirrors_settings() {
    let s = StickerSettings {
        outline_width: 3,
        contrast_pct: 20.0,
        ..StickerSettings::default()
    };
    let o = s.outline();
    assert_eq!(o.width, 3);
    assert_eq!(o.contrast_pct, 20.0);
    assert_eq!(o.color, [255, 255, 255, 255]);
}
