use super::command::*;

#[test]
fn test_args_without_credentials() {
    let cmd = InspectCommand::new("skopeo", "library/nginx:1.25");
    assert_eq!(
        cmd.args(),
        vec![
            "inspect",
            "--override-os",
            "linux",
            "docker://library/nginx:1.25"
        ]
    );
    assert_eq!(cmd.program(), "skopeo");
}

#[test]
fn test_args_raw_with_credentials() {
    let cmd = InspectCommand::new("skopeo", "library/nginx:1.25")
        .credentials("ci-bot", "dckr_pat")
        .raw(true);
    let args = cmd.args();

    // --creds and its value are separate arguments, ahead of the image
    let creds = args.iter().position(|a| a == "--creds").unwrap();
    assert_eq!(args[creds + 1], "ci-bot:dckr_pat");
    assert!(args.contains(&"--raw".to_string()));
    assert_eq!(args.last().unwrap(), "docker://library/nginx:1.25");
}

#[test]
fn test_secret_with_shell_metacharacters_is_one_argument() {
    let cmd = InspectCommand::new("skopeo", "library/nginx:1.25")
        .credentials("ci bot", "p@ss word;$(rm -rf /)");
    assert!(cmd.args().contains(&"ci bot:p@ss word;$(rm -rf /)".to_string()));
}

#[test]
fn test_override_os() {
    let cmd = InspectCommand::new("skopeo", "library/nginx:1.25").override_os("windows");
    let args = cmd.args();
    let flag = args.iter().position(|a| a == "--override-os").unwrap();
    assert_eq!(args[flag + 1], "windows");
}

#[test]
fn test_display_redacts_credentials() {
    let cmd = InspectCommand::new("skopeo", "library/nginx:1.25")
        .credentials("ci-bot", "dckr_pat")
        .raw(true);
    let shown = cmd.to_string();
    assert_eq!(
        shown,
        "skopeo inspect --creds <redacted> --override-os linux --raw docker://library/nginx:1.25"
    );
    assert!(!format!("{:?}", cmd).contains("dckr_pat"));
}

#[tokio::test]
async fn test_process_runner_reports_missing_program() {
    let cmd = InspectCommand::new("regdigest-test-no-such-program", "library/nginx:1.25");
    let result = ProcessRunner.run(&cmd).await;
    assert!(result.is_err());
}
