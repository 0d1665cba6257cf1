//! calstudy main entrypoint.

use calstudy::run;
use calstudy::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(e);
        std::process::exit(1);
    }
}
