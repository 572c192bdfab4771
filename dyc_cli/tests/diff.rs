use dyc_core::AnyEmptyResult;

mod common;

const APP_SOURCE: &str = "\"\"\"App.\"\"\"


def first(a):
    return a


def second(b):
    return b
";

#[test]
fn diff_documents_only_patched_constructs() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let path = tmp.path().join("app.py");
	std::fs::write(&path, APP_SOURCE)?;
	std::fs::write(
		tmp.path().join("patches.json"),
		r#"[{"path": "app.py", "additions": [{"hunk": [8, 9], "patch": "def second(b):\n    return b\n"}]}]"#,
	)?;

	common::dyc_cmd()
		.args(["diff", "--patches", "patches.json", "--placeholders", "--path"])
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Documented app.py (1 block(s))"));

	let content = std::fs::read_to_string(&path)?;
	assert!(content.contains("def first(a):\n    return a\n"));
	assert!(content.contains("def second(b):\n    \"\"\"\n    <docstring>\n"));

	Ok(())
}

#[test]
fn invalid_patch_file_is_fatal() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("patches.json"), "{ not json")?;

	common::dyc_cmd()
		.args(["diff", "--patches", "patches.json", "--placeholders", "--path"])
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to load patch file"));

	Ok(())
}

const NEW_FILE_SOURCE: &str = "def first(a):
    return a


class Greeter(object):
    def greet(self, name):
        return name


def second(b):
    return b
";

#[test]
fn diff_over_a_new_file_documents_every_kind() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("app.py"), NEW_FILE_SOURCE)?;
	let patches = serde_json::json!([{
		"path": "app.py",
		"additions": [{"hunk": [1, 11], "patch": NEW_FILE_SOURCE}],
	}]);
	std::fs::write(tmp.path().join("patches.json"), patches.to_string())?;

	common::dyc_cmd()
		.args(["diff", "--patches", "patches.json", "--placeholders", "--path"])
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Documented app.py (5 block(s))"));

	common::dyc_cmd()
		.args(["list", "--path"])
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Everything is documented."));

	Ok(())
}
