use ghostscan::detect::os::{parse_browser, parse_os};

#[test]
fn windows_versions() {
    assert_eq!(parse_os("Mozilla/5.0 (Windows NT 10.0; Win64; x64)").display(), "Windows 10");
    assert_eq!(parse_os("Mozilla/5.0 (Windows NT 11.0; Win64; x64)").display(), "Windows 11");
    assert_eq!(parse_os("Mozilla/5.0 (Windows NT 6.3; WOW64)").display(), "Windows 8.1");
    assert_eq!(parse_os("Mozilla/5.0 (Windows NT 6.2; WOW64)").display(), "Windows 8");
}

#[test]
fn mac_versions_are_normalised_to_dots() {
    let ua = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1 Safari/605.1.15";
    let os = parse_os(ua);
    assert_eq!(os.name, "macOS");
    assert_eq!(os.version.as_deref(), Some("10.15.7"));
    assert_eq!(parse_browser(ua).display(), "Safari 17.1");

    let dotted = parse_os("Mozilla/5.0 (Macintosh; Intel Mac OS X 14.2; rv:121.0) Gecko/20100101 Firefox/121.0");
    assert_eq!(dotted.version.as_deref(), Some("14.2"));
}

#[test]
fn android_before_linux() {
    let ua = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.144 Mobile Safari/537.36";
    assert_eq!(parse_os(ua).display(), "Android 14");
    assert_eq!(parse_browser(ua).display(), "Chrome 120.0.6099.144");
}

#[test]
fn ios_devices() {
    let ua = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_1_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.1.2 Mobile/15E148 Safari/604.1";
    let os = parse_os(ua);
    assert_eq!(os.name, "iOS");
    assert_eq!(os.version.as_deref(), Some("17.1"));
    assert_eq!(parse_browser(ua).display(), "Safari 17.1.2");
}

#[test]
fn plain_linux_has_no_version() {
    let ua = "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0";
    assert_eq!(parse_os(ua).display(), "Linux");
    assert_eq!(parse_browser(ua).display(), "Firefox 121.0");
}

#[test]
fn unmatched_strings_are_unknown() {
    assert_eq!(parse_os("curl/8.4.0").display(), "Unknown");
    assert_eq!(parse_browser("curl/8.4.0").display(), "Unknown");
    // Safari needs its Version token
    assert_eq!(parse_browser("Mozilla/5.0 AppleWebKit Safari/605.1.15").name, "Unknown");
}
