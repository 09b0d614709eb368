#[cfg(test)]
mod tests {
    use std::io::Write;

    use crate::config::*;

    #[test]
    fn test_defaults_match_programs() {
        let cfg = BenchConfig::default();
        assert_eq!(cfg.fib_n, 40);
        assert_eq!(cfg.matrix_n, 1000);
        assert_eq!(cfg.sort_n, 1_000_000);
        assert_eq!(cfg.seed, 42);
        assert!(cfg.threads >= 1);
    }

    #[test]
    fn test_partial_override() {
        let cfg = BenchConfig::from_toml_str("matrix_n = 128\nseed = 7\n").unwrap();
        assert_eq!(cfg.matrix_n, 128);
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.fib_n, BenchConfig::default().fib_n);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(BenchConfig::from_toml_str("").unwrap(), BenchConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = BenchConfig::from_toml_str("matrix_size = 3\n").unwrap_err();
        assert!(format!("{err:#}").contains("matrix_size"), "{err:#}");
    }

    #[test]
    fn test_zero_threads_rejected() {
        let err = BenchConfig::from_toml_str("threads = 0\n").unwrap_err();
        assert!(err.to_string().contains("threads"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "fib_n = 12\nsort_n = 64").expect("write config");
        let cfg = BenchConfig::load(file.path()).unwrap();
        assert_eq!(cfg.fib_n, 12);
        assert_eq!(cfg.sort_n, 64);
    }

    #[test]
    fn test_load_missing_file_mentions_path() {
        let err = BenchConfig::load(std::path::Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("here.toml"));
    }
}
