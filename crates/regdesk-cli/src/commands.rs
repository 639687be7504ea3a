//! Subcommand implementations

use anyhow::{bail, Context, Result};
use regdesk_draft::{DraftStore, FileStore, SystemClock};
use regdesk_modal::{
    FormSurface, MemoryView, ModalServices, RegdeskConfig, RegistrationModal, SubmissionOutcome,
    ToastLog,
};
use regdesk_rules::{fields, CompetitionId, FormValidator, FormValues};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn load_config(path: Option<&Path>) -> Result<RegdeskConfig> {
    match path {
        Some(path) => RegdeskConfig::load(path).map_err(Into::into),
        None => Ok(RegdeskConfig::default()),
    }
}

fn read_values(path: &Path) -> Result<FormValues> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading values from {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing values in {}", path.display()))
}

/// `regdesk validate`
pub(crate) fn validate(values: PathBuf, config: Option<PathBuf>) -> Result<bool> {
    let config = load_config(config.as_deref())?;
    let values = read_values(&values)?;
    let report = FormValidator::new(config.validation.team_size_policy).validate(&values);

    println!("{}", serde_json::to_string_pretty(report.errors())?);
    Ok(report.is_valid())
}

/// `regdesk submit`
pub(crate) async fn submit(
    competition: String,
    values: PathBuf,
    config: Option<PathBuf>,
    drafts_dir: Option<PathBuf>,
) -> Result<bool> {
    let mut config = load_config(config.as_deref())?;
    if let Some(dir) = drafts_dir {
        config = config.with_draft_directory(dir);
    }
    let values = read_values(&values)?;

    let toasts = Arc::new(ToastLog::new());
    let services = ModalServices::from_config(&config)?.with_notifier(toasts.clone());
    let modal = RegistrationModal::new(MemoryView::registration_form(), services, &config);

    tracing::info!(%competition, fields = values.len(), "Submitting registration");
    modal.try_open(&competition)?;
    if let Some(size) = values.get(fields::TEAM_SIZE) {
        modal.with_view(|view| view.set_value(fields::TEAM_SIZE, size));
        modal.try_update_member_fields()?;
    }
    modal.with_view(|view| view.fill(&values));

    let outcome = modal.try_submit().await?;

    for toast in toasts.toasts() {
        println!("[{}] {}", toast.kind, toast.message);
    }
    let succeeded = match &outcome {
        SubmissionOutcome::Succeeded(receipt) => {
            println!("submitted {} at {}", receipt.id, receipt.accepted_at.to_rfc3339());
            true
        }
        SubmissionOutcome::Rejected(errors) => {
            println!("{}", serde_json::to_string_pretty(errors)?);
            false
        }
        SubmissionOutcome::Failed { reason } => {
            println!("failed: {reason}");
            false
        }
        SubmissionOutcome::Cancelled | SubmissionOutcome::Ignored => false,
    };
    tracing::info!(%competition, outcome = outcome.label(), "Submission finished");
    println!("outcome: {}", outcome.label());
    Ok(succeeded)
}

/// `regdesk draft`
pub(crate) fn draft(
    competition: String,
    drafts_dir: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<bool> {
    let config = load_config(config.as_deref())?;
    let competition = CompetitionId::new(competition)?;
    let directory = drafts_dir.unwrap_or_else(|| config.drafts.directory.clone());
    let drafts = DraftStore::new(Arc::new(FileStore::new(directory)), Arc::new(SystemClock))
        .with_freshness(config.freshness());

    tracing::debug!(%competition, "Inspecting saved draft");
    let Some(snapshot) = drafts.inspect(&competition)? else {
        println!("no draft saved for {competition}");
        return Ok(false);
    };
    if !snapshot.fresh {
        bail!(
            "draft for {competition} is {}s old and no longer usable",
            snapshot.age_ms / 1000
        );
    }
    println!("{}", serde_json::to_string_pretty(&snapshot.record.data)?);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_values(dir: &Path, json: &str) -> PathBuf {
        let path = dir.join("values.json");
        std::fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn values_file_round_trips_into_form_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_values(dir.path(), r#"{"teamName": "Otters", "teamSize": "2"}"#);
        let values = read_values(&path).unwrap();
        assert_eq!(values.get("teamName"), Some("Otters"));
        assert_eq!(values.len(), 2);
    }

    #[test]
    fn validate_reports_invalid_forms() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_values(dir.path(), r#"{"leaderName": "A"}"#);
        assert!(!validate(path, None).unwrap());
    }

    #[test]
    fn missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_values(dir.path(), "{}");
        assert!(validate(path, Some(dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn draft_without_saved_record() {
        let dir = tempfile::tempdir().unwrap();
        let found = draft("hackathon".into(), Some(dir.path().to_path_buf()), None).unwrap();
        assert!(!found);
    }

    #[tokio::test]
    async fn submit_saves_a_draft() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("regdesk.toml");
        std::fs::write(&config_path, "[submission]\ndelay_ms = 0\n").unwrap();
        let values = write_values(
            dir.path(),
            r#"{
                "leaderName": "Ada Lovelace",
                "leaderEmail": "ada@example.org",
                "leaderPhone": "+44 20 7946 0958",
                "university": "UCL",
                "faculty": "Mathematics",
                "teamName": "Engines",
                "teamSize": "2",
                "member2Name": "Charles Babbage",
                "member2Email": "charles@example.org"
            }"#,
        );
        let drafts = dir.path().join("drafts");

        let submitted = submit(
            "hackathon".into(),
            values,
            Some(config_path.clone()),
            Some(drafts.clone()),
        )
        .await
        .unwrap();
        assert!(submitted);
        assert!(drafts.join("registration_backup_hackathon.json").exists());

        assert!(draft("hackathon".into(), Some(drafts), Some(config_path)).unwrap());
    }
}
