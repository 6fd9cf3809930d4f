use a32_translate::settings::{self, Configurable, Flags, SetError};

#[test]
fn defaults() {
    let flags = Flags::default();
    assert!(flags.enable_neon());
    assert!(flags.enable_vfp());
    assert!(flags.enable_verifier());
    assert_eq!(flags, Flags::new(settings::builder()));
}

#[test]
fn builder_rejects_bad_input() {
    let mut b = settings::builder();
    assert!(matches!(b.set("enable_jit", "true"), Err(SetError::BadName(_))));
    assert!(matches!(b.set("enable_vfp", "2"), Err(SetError::BadValue(_))));
    assert_eq!(
        b.set("enable_vfp", "2").unwrap_err().to_string(),
        "Unexpected value for a setting, expected bool"
    );
    let names: Vec<_> = b.iter().map(|s| s.name).collect();
    assert_eq!(names, ["enable_neon", "enable_vfp", "enable_verifier"]);
}

#[cfg(feature = "enable-serde")]
#[test]
fn serde() {
    let mut b = settings::builder();
    b.set("enable_neon", "no").unwrap();
    let flags = Flags::new(b);
    let json = serde_json::to_string(&flags).unwrap();
    assert_eq!(
        json,
        r#"{"enable_neon":false,"enable_vfp":true,"enable_verifier":true}"#
    );
    let back: Flags = serde_json::from_str(&json).unwrap();
    assert_eq!(back, flags);
}
