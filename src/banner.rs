//! Startup banner and exit summary.

use std::num::NonZeroUsize;
use std::time::Duration;

use crate::consts::{AUTHOR, HOMEPAGE, REPO, format_number};

pub struct BannerInfo<'a> {
    pub endpoint: &'a str,
    pub app_id: &'a str,
    pub fetch_delay: Duration,
    pub log_capacity: Option<NonZeroUsize>,
}

pub fn banner_text(info: &BannerInfo) -> String {
    let retention = match info.log_capacity {
        Some(cap) => format!("last {} calls", format_number(cap.get() as u64)),
        None => "unbounded".to_string(),
    };
    format!(
        r#"
   ╔═══════════════════════════════════════╗
   ║     Q U I C K   R E S E A R C H       ║
   ║   one question, one paragraph back    ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   repo      {}
   endpoint  {}
   app       {}
   delay     {} ms
   log       {}

   type a question, or /help
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.endpoint,
        info.app_id,
        info.fetch_delay.as_millis(),
        retention,
    )
}

pub fn print_banner(info: &BannerInfo) {
    println!("{}", banner_text(info));
}

/// Calls made and objects still alive on the service.
pub fn summary_text(calls: usize, outstanding: usize) -> String {
    let mut out = format!("session: {} API call(s)\n", format_number(calls as u64));
    if outstanding > 0 {
        out.push_str(&format!(
            "warning: {outstanding} remote object(s) not deleted (use /delete next time)\n"
        ));
    }
    out.push_str("goodbye.");
    out
}

pub fn print_session_summary(calls: usize, outstanding: usize) {
    println!("{}", summary_text(calls, outstanding));
}
