use common::GREET_SOURCE;
use dyc_core::AnyEmptyResult;
use similar_asserts::assert_eq;

mod common;

#[test]
fn list_reports_undocumented_constructs() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("greet.py"), GREET_SOURCE)?;

	common::dyc_cmd()
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("greet.py:4 method greet"))
		.stdout(predicates::str::contains("Found 1 undocumented construct(s)."));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("greet.py"))?,
		GREET_SOURCE
	);

	Ok(())
}

#[test]
fn list_json_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("greet.py"), "def greet(self, name):\n    pass\n")?;

	let output = common::dyc_cmd()
		.args(["list", "--format", "json", "--path"])
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let entries: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(
		entries,
		serde_json::json!([
			{
				"file": "greet.py",
				"line": 1,
				"kind": "top",
				"name": "greet.py",
				"arguments": [],
			},
			{
				"file": "greet.py",
				"line": 1,
				"kind": "method",
				"name": "greet",
				"arguments": ["name"],
			},
		])
	);

	Ok(())
}

#[test]
fn list_everything_documented() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("greet.py"),
		"\"\"\"Module.\"\"\"\n\n\ndef greet():\n    \"\"\"Greets.\"\"\"\n",
	)?;

	common::dyc_cmd()
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Everything is documented."));

	Ok(())
}
