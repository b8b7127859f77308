use std::path::Path;
use std::process::{Command, Output};

use wiremock::MockServer;

/// Base URL of a mock backend.
pub fn api_url(server: &MockServer) -> String {
    format!("http://127.0.0.1:{}", server.address().port())
}

/// Run the CLI against `api_url` with an isolated session file.
pub fn run_cli(args: &[&str], token_file: &Path, api_url: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_verigov"));
    cmd.args(args);
    cmd.arg("--api-url").arg(api_url);
    cmd.arg("--token-file").arg(token_file);
    cmd.env_remove("VERIGOV_API_URL");
    cmd.env_remove("VERIGOV_TOKEN_FILE");
    cmd.env_remove("VERIGOV_PASSWORD");
    cmd.env_remove("RUST_LOG");
    cmd.env("NO_COLOR", "1");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub fn run_cli_success(args: &[&str], token_file: &Path, api_url: &str) -> String {
    let output = run_cli(args, token_file, api_url);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Run the CLI and expect failure, returning stderr.
pub fn run_cli_failure(args: &[&str], token_file: &Path, api_url: &str) -> String {
    let output = run_cli(args, token_file, api_url);
    if output.status.success() {
        panic!("CLI command should have failed: {:?}", args);
    }
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Write a session file the way the CLI would after a login.
pub fn seed_session(token_file: &Path, access: &str, refresh: &str) {
    use verigov_core::{CredentialPair, TokenStore};

    let store = verigov_file::FileTokenStore::open(token_file).unwrap();
    store
        .set_tokens(CredentialPair::new(access, refresh))
        .unwrap();
}
