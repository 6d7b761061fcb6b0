//! Unit name normalization.

/// Qualify a bare unit name with `default_suffix`.
///
/// systemd needs the full unit name ("nginx.service"); operators and models
/// often say just "nginx". Anything that already contains a dot is treated
/// as qualified and passed through untouched.
pub fn normalize_unit_name(unit_name: &str, default_suffix: &str) -> String {
    let unit_name = unit_name.trim();
    if unit_name.contains('.') {
        unit_name.to_string()
    } else {
        format!("{unit_name}.{default_suffix}")
    }
}

/// Sentence telling the model how bare names are qualified.
pub fn suffix_hint(default_suffix: &str) -> String {
    format!("If the unit name has no suffix, '.{default_suffix}' is appended.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_gets_service_suffix() {
        assert_eq!(normalize_unit_name("nginx", "service"), "nginx.service");
    }

    #[test]
    fn qualified_names_pass_through() {
        assert_eq!(normalize_unit_name("nginx.socket", "service"), "nginx.socket");
        assert_eq!(normalize_unit_name("sshd.service", "service"), "sshd.service");
        assert_eq!(normalize_unit_name("logrotate.timer", "service"), "logrotate.timer");
    }

    #[test]
    fn templated_and_custom_suffix() {
        assert_eq!(normalize_unit_name("getty@tty1", "service"), "getty@tty1.service");
        assert_eq!(normalize_unit_name("backup", "timer"), "backup.timer");
    }

    #[test]
    fn surrounding_whitespace_is_dropped() {
        assert_eq!(normalize_unit_name("  cron ", "service"), "cron.service");
    }

    #[test]
    fn hint_names_the_configured_suffix() {
        assert!(suffix_hint("service").contains("'.service'"));
        assert!(suffix_hint("socket").contains("'.socket'"));
    }
}
