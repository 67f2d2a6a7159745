//! Identification of the running platform.
//!
//! Reader descriptors may be restricted to a list of platforms
//! (for instance, when the codec depends on a native library
//! only built for some targets).
//! Platforms are identified by a tag of the form `<os>-<arch>`,
//! such as `linux-x86-64` or `windows-x86`,
//! using the same normalized names as OSGi native code declarations.
use once_cell::sync::OnceCell;
use tracing::debug;

/// Environment variable which, when set and not blank,
/// overrides the detected platform tag.
pub const PLATFORM_TAG_ENV: &str = "DICOM_NATIVE_LIBRARY_SPEC";

static PLATFORM_TAG: OnceCell<Option<String>> = OnceCell::new();

/// Obtain the platform tag of the running program.
///
/// The tag is resolved once and then kept for the rest of the program's
/// lifetime. It is taken from [`PLATFORM_TAG_ENV`] if available, and
/// derived from the compilation target's operating system and
/// architecture otherwise.
pub fn platform_tag() -> Option<&'static str> {
    PLATFORM_TAG
        .get_or_init(|| {
            let tag = detect_platform_tag();
            debug!("Resolved platform tag: {:?}", tag);
            tag
        })
        .as_deref()
}

fn detect_platform_tag() -> Option<String> {
    let spec = std::env::var(PLATFORM_TAG_ENV).ok();
    tag_override(spec.as_deref()).or_else(|| {
        platform_tag_from(Some(std::env::consts::OS), Some(std::env::consts::ARCH))
    })
}

/// Blank overrides do not count.
fn tag_override(spec: Option<&str>) -> Option<String> {
    spec.map(str::trim)
        .filter(|spec| !spec.is_empty())
        .map(str::to_string)
}

/// Build a platform tag from raw operating system and architecture names.
///
/// Returns `None` if either of them is missing or blank.
pub fn platform_tag_from(os_name: Option<&str>, os_arch: Option<&str>) -> Option<String> {
    let os_name = os_name.filter(|s| !s.trim().is_empty())?;
    let os_arch = os_arch.filter(|s| !s.trim().is_empty())?;
    Some(format!("{}-{}", normalize_os(os_name), normalize_arch(os_arch)))
}

/// Normalize an operating system name.
///
/// All Windows versions are grouped under `windows`.
pub fn normalize_os(os_name: &str) -> String {
    let lower = os_name.to_lowercase();
    if lower.starts_with("win") {
        return "windows".to_string();
    }
    match os_name {
        "Mac OS X" => "macosx".to_string(),
        "SymbianOS" => "epoc32".to_string(),
        "hp-ux" => "hpux".to_string(),
        "Mac OS" => "macos".to_string(),
        "OS/2" => "os2".to_string(),
        "procnto" => "qnx".to_string(),
        _ => lower,
    }
}

/// Normalize a processor architecture name.
pub fn normalize_arch(os_arch: &str) -> String {
    match os_arch {
        "pentium" | "i386" | "i486" | "i586" | "i686" => "x86".to_string(),
        "amd64" | "em64t" | "x86_64" => "x86-64".to_string(),
        "power ppc" => "powerpc".to_string(),
        "psc1k" => "ignite".to_string(),
        _ => os_arch.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("   "), None)]
    #[case(Some("linux-x86-64"), Some("linux-x86-64"))]
    #[case(Some(" linux-x86-64 \n"), Some("linux-x86-64"))]
    fn override_is_trimmed(#[case] spec: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(tag_override(spec).as_deref(), expected);
    }

    #[rstest]
    #[case("Windows 10", "amd64", "windows-x86-64")]
    #[case("Windows XP", "x86", "windows-x86")]
    #[case("Mac OS X", "x86_64", "macosx-x86-64")]
    #[case("Mac OS", "power ppc", "macos-powerpc")]
    #[case("Linux", "i686", "linux-x86")]
    #[case("linux", "aarch64", "linux-aarch64")]
    #[case("SymbianOS", "arm", "epoc32-arm")]
    #[case("hp-ux", "PA_RISC2.0", "hpux-pa_risc2.0")]
    #[case("OS/2", "pentium", "os2-x86")]
    #[case("procnto", "psc1k", "qnx-ignite")]
    #[case("SunOS", "em64t", "sunos-x86-64")]
    fn normalized_tags(#[case] os: &str, #[case] arch: &str, #[case] expected: &str) {
        assert_eq!(
            platform_tag_from(Some(os), Some(arch)).as_deref(),
            Some(expected)
        );
    }

    #[rstest]
    #[case(None, Some("amd64"))]
    #[case(Some("Linux"), None)]
    #[case(Some(""), Some("amd64"))]
    #[case(Some("Linux"), Some("   "))]
    #[case(None, None)]
    fn missing_or_blank_yields_no_tag(#[case] os: Option<&str>, #[case] arch: Option<&str>) {
        assert_eq!(platform_tag_from(os, arch), None);
    }

    #[test]
    fn platform_tag_is_cached() {
        let a = platform_tag();
        let b = platform_tag();
        assert_eq!(a, b);
        if let (Some(a), Some(b)) = (a, b) {
            assert!(std::ptr::eq(a, b));
        }
    }
}
