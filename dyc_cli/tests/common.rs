#![allow(dead_code)]

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn dyc_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("dyc"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}

pub const GREET_SOURCE: &str = "\"\"\"Greeting helpers.\"\"\"


def greet(name):
    return \"hello \" + name
";

pub const GREET_DOCUMENTED: &str = "\"\"\"Greeting helpers.\"\"\"


def greet(name):
    \"\"\"
    <docstring>

    Parameters
    ----------
    <type> name: <arg docstring>
    \"\"\"
    return \"hello \" + name
";
