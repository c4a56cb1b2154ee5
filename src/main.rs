//! closetrack main entrypoint.

use closetrack::run;
use closetrack::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
