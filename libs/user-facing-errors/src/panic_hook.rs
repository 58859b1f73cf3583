use crate::Error;
use std::io::{self, Write};

/// Exit code of an engine stopped by a panic.
pub const PANIC_EXIT_CODE: i32 = 255;

/// Makes a panic in `engine` end the process with a single JSON error line on stderr.
pub fn set_panic_hook(engine: &'static str) {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic| {
        let err = Error::new_in_panic_hook(panic);
        tracing::error!(engine, message = err.message(), "engine panicked");

        if let Err(write_err) = write_panic_report(&mut io::stderr().lock(), &err) {
            tracing::error!(engine, error = %write_err, "could not write the panic report");
            original_hook(panic);
        }

        std::process::exit(PANIC_EXIT_CODE)
    }));
}

fn write_panic_report<W: Write>(writer: &mut W, err: &Error) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, err)?;
    writeln!(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn panic_reports_are_a_single_json_line() {
        let err = Error::from_panic_payload(Box::new("cannot decode global id"));
        let mut out = Vec::new();

        write_panic_report(&mut out, &err).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.ends_with('\n'));

        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["is_panic"], serde_json::json!(true));
        assert_eq!(json["message"], serde_json::json!("cannot decode global id"));
    }
}
