//! Integration tests for types

#[cfg(test)]
mod tests {
    use stepx_types::*;

    #[test]
    fn test_request_serialization_round_trip() {
        let request = BuildStepRequest::new("cpy311", "shell", "tox -e py311", true);
        let json = serde_json::to_string(&request).unwrap();
        let back: BuildStepRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn test_ignore_flag_defaults_to_false() {
        // Persisted records written before the flag existed omit it
        let json = r#"{"installation":"cpy311","nature":"shell","command":"make"}"#;
        let request: BuildStepRequest = serde_json::from_str(json).unwrap();
        assert!(!request.ignore_exit_code);
    }

    #[test]
    fn test_request_construction_never_validates_names() {
        // Resolution is lazy: nonsense names are fine at construction time
        let request = BuildStepRequest::new("gone", "retired-nature", "", false);
        assert_eq!(request.installation, "gone");
        assert_eq!(request.nature, "retired-nature");
    }

    #[test]
    fn test_installation_serialization() {
        let installation = Installation::new("pypy", "/opt/toolchains/pypy");
        let json = serde_json::to_string(&installation).unwrap();
        let back: Installation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, installation);
    }
}
