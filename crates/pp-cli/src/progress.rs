use indicatif::{ProgressBar, ProgressStyle};

/// Terminal progress bar over `total` items, labelled with `label`.
///
/// Draws to stderr and stays hidden when stderr is not a terminal.
pub fn progress_bar(total: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}",
        )
        .expect("progress template is valid")
        .progress_chars("█▓░"),
    );
    pb.set_message(label.to_owned());
    pb
}
