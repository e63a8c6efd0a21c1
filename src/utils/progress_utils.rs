use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for row-by-row store writes. Returns `None` for empty
/// workloads so callers can skip drawing entirely.
pub fn progress_bar(len: u64, msg: String) -> Option<ProgressBar> {
    if len == 0 {
        return None;
    }

    let bar = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
    {
        bar.set_style(style.progress_chars("##-"));
    }
    bar.set_message(msg);

    Some(bar)
}
