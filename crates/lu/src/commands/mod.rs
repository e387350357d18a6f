//! Subcommand implementations.

pub mod build;
pub mod compile;
pub mod init;

use lu_project::{BuildReport, Severity};

/// Print the completion line, then each notice.
pub fn print_report(report: &BuildReport) {
    tracing::info!(
        written = report.written.len(),
        notices = report.notices.len(),
        "build finished"
    );
    match report.notices.len() {
        0 => println!("Complete!"),
        1 => println!("Complete, with 1 notice:"),
        n => println!("Complete, with {n} notices:"),
    }
    for notice in &report.notices {
        match notice.severity {
            Severity::Info => println!("{notice}"),
            Severity::Warning => eprintln!("warning: {notice}"),
        }
    }
}
