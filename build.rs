//! Stamps `fxlib-cli version` with the build date and time (UTC).
//! Either value can be pinned through the environment for reproducible builds.

use time::{format_description, OffsetDateTime};

fn stamp(var: &str, now: OffsetDateTime, pattern: &str) {
    let value = std::env::var(var)
        .ok()
        .or_else(|| {
            let format = format_description::parse(pattern).ok()?;
            now.format(&format).ok()
        })
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env={var}={value}");
    println!("cargo:rerun-if-env-changed={var}");
}

fn main() {
    let now = OffsetDateTime::now_utc();
    stamp("FXLIB_BUILD_DATE", now, "[year]-[month]-[day]");
    stamp("FXLIB_BUILD_TIME", now, "[hour]:[minute] UTC");
}
