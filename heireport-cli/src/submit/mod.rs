//! Bulk submission of mapped records
//!
//! Records are validated as a whole first; any violation aborts before the
//! first request. Submission then runs in order, one request per record
//! (`sequential`) or per chunk (`bulk`), and stops at the first failed call.
//! Workbooks that carry the institution itself (Form A) are submitted in two
//! phases: the institution first, then its campuses with the returned id.

mod progress;

use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use progress::{Progress, render_bar};

use crate::api::{ApiError, Executor, Operation};
use crate::excel::templates::Template;
use crate::excel::upload::UploadPolicy;
use crate::excel::{MappedWorkbook, read_workbook};
use crate::records::{Record, RecordKind};
use crate::validation::{RecordIssue, validate_records};

/// Default number of records per bulk request
pub const DEFAULT_BATCH_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SubmitMode {
    /// One create request per record
    #[default]
    Sequential,
    /// One request per chunk of records
    Bulk,
}

#[derive(Debug, Clone)]
pub struct SubmitOptions {
    pub mode: SubmitMode,
    pub batch_size: usize,
    /// Existing institution the records belong to
    pub institution_id: Option<String>,
    /// Map and validate only
    pub dry_run: bool,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            mode: SubmitMode::Sequential,
            batch_size: DEFAULT_BATCH_SIZE,
            institution_id: None,
            dry_run: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("{} record(s) failed validation; nothing was submitted", issues.len())]
    Invalid { issues: Vec<RecordIssue> },

    #[error("An institution id is required for {kind} records (use --institution)")]
    NoInstitution { kind: RecordKind },

    #[error("The institution was saved but the server returned no id")]
    MissingInstitutionId,

    #[error("Submission aborted at {location} after {completed} of {total} records: {source}")]
    Failed {
        completed: usize,
        total: usize,
        location: String,
        #[source]
        source: ApiError,
    },
}

/// Summary of a finished submission
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReport {
    pub submitted: usize,
    pub calls: usize,
    pub institution_id: Option<String>,
}

/// Validate and submit records, reporting progress after every call
pub async fn submit<E: Executor + ?Sized>(
    executor: &E,
    records: &[Record],
    options: &SubmitOptions,
    on_progress: &mut dyn FnMut(Progress),
) -> Result<SubmitReport, SubmitError> {
    let issues = validate_records(records);
    if !issues.is_empty() {
        return Err(SubmitError::Invalid { issues });
    }

    let (institutions, members): (Vec<&Record>, Vec<&Record>) = records
        .iter()
        .partition(|r| r.kind == RecordKind::Institution);

    if institutions.is_empty() && options.institution_id.is_none() {
        if let Some(record) = members.iter().find(|r| r.kind.belongs_to_institution()) {
            return Err(SubmitError::NoInstitution { kind: record.kind });
        }
    }

    let mut progress = Progress::new(records.len());
    let mut calls = 0;
    let mut institution_id = options.institution_id.clone();
    on_progress(progress);

    // Phase 1: the institution profile itself
    for record in institutions {
        let operation = match &institution_id {
            Some(id) => Operation::update(RecordKind::Institution.resource(), id, record.to_payload()),
            None => Operation::create(RecordKind::Institution.resource(), record.to_payload()),
        };
        let result = executor
            .execute(&operation)
            .await
            .map_err(|source| SubmitError::Failed {
                completed: progress.completed,
                total: progress.total,
                location: record.location(),
                source,
            })?;
        calls += 1;

        if institution_id.is_none() {
            institution_id = Some(result.record_id().ok_or(SubmitError::MissingInstitutionId)?);
        }
        info!("Institution saved (id {})", institution_id.as_deref().unwrap_or("?"));

        progress.advance(1);
        on_progress(progress);
    }

    // Phase 2: records that belong to the institution
    for (operation, location) in plan_operations(&members, institution_id.as_deref(), options) {
        debug!(
            "{} {} ({} record(s))",
            operation.http_method(),
            operation.path(),
            operation.record_count()
        );
        executor
            .execute(&operation)
            .await
            .map_err(|source| SubmitError::Failed {
                completed: progress.completed,
                total: progress.total,
                location: location.clone(),
                source,
            })?;
        calls += 1;

        progress.advance(operation.record_count());
        on_progress(progress);
    }

    Ok(SubmitReport {
        submitted: progress.completed,
        calls,
        institution_id,
    })
}

/// Build create operations for institution members, with the location used
/// in error messages (first record of a chunk for bulk requests)
fn plan_operations(
    records: &[&Record],
    institution_id: Option<&str>,
    options: &SubmitOptions,
) -> Vec<(Operation, String)> {
    let payload = |record: &Record| -> Value {
        let mut body = record.to_payload();
        if let (Some(id), Value::Object(obj)) = (institution_id, &mut body) {
            if record.kind.belongs_to_institution() {
                obj.insert("institution_id".to_string(), Value::String(id.to_string()));
            }
        }
        body
    };

    match options.mode {
        SubmitMode::Sequential => records
            .iter()
            .map(|&r| (Operation::create(r.kind.resource(), payload(r)), r.location()))
            .collect(),
        SubmitMode::Bulk => {
            let batch_size = options.batch_size.max(1);
            let mut operations = Vec::new();
            // Chunk runs of the same kind so each request targets one resource
            for group in records.chunk_by(|a, b| a.kind == b.kind) {
                for chunk in group.chunks(batch_size) {
                    let resource = chunk[0].kind.resource();
                    let data = chunk.iter().map(|&r| payload(r)).collect();
                    let location = if chunk.len() == 1 {
                        chunk[0].location()
                    } else {
                        format!("{}..{}", chunk[0].location(), chunk[chunk.len() - 1].location())
                    };
                    operations.push((Operation::bulk_create(resource, data), location));
                }
            }
            operations
        }
    }
}

/// Outcome of the upload pipeline
#[derive(Debug)]
pub struct UploadOutcome {
    pub mapped: MappedWorkbook,
    /// None when nothing was sent (dry run, no valid rows, declined)
    pub report: Option<SubmitReport>,
}

/// Full upload: file guard, mapping, confirmation, validation and submission.
///
/// The file guard runs before the workbook is opened, so rejected files never
/// reach the API.
pub async fn upload_workbook<E: Executor + ?Sized>(
    executor: &E,
    path: &Path,
    template: &Template,
    policy: &UploadPolicy,
    options: &SubmitOptions,
    confirm: &mut dyn FnMut(&MappedWorkbook) -> bool,
    on_progress: &mut dyn FnMut(Progress),
) -> Result<UploadOutcome> {
    let size = policy.check(path)?;
    info!("Reading {} ({} bytes) as {}", path.display(), size, template.id);

    let mapped = read_workbook(path, template)?;
    if mapped.is_empty() || options.dry_run {
        if options.dry_run {
            // Still surface validation problems on a dry run
            let issues = validate_records(&mapped.records);
            if !issues.is_empty() {
                return Err(SubmitError::Invalid { issues }.into());
            }
        }
        return Ok(UploadOutcome {
            mapped,
            report: None,
        });
    }

    if !confirm(&mapped) {
        return Ok(UploadOutcome {
            mapped,
            report: None,
        });
    }

    let report = submit(executor, &mapped.records, options, on_progress).await?;
    Ok(UploadOutcome {
        mapped,
        report: Some(report),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rust_xlsxwriter::Workbook;
    use serde_json::json;

    use crate::api::OperationResult;
    use crate::excel::templates::TemplateId;
    use crate::excel::upload::UploadError;
    use crate::records::Value as FieldValue;

    /// Records every operation; optionally fails the n-th call
    #[derive(Default)]
    struct RecordingExecutor {
        calls: Mutex<Vec<Operation>>,
        fail_on_call: Option<usize>,
    }

    impl RecordingExecutor {
        fn failing_on(call: usize) -> Self {
            Self {
                fail_on_call: Some(call),
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Operation> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Executor for RecordingExecutor {
        async fn execute(&self, operation: &Operation) -> Result<OperationResult, ApiError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(operation.clone());
            if Some(calls.len()) == self.fail_on_call {
                return Err(ApiError::Server {
                    status: 422,
                    message: "The name has already been taken.".to_string(),
                });
            }
            Ok(OperationResult::new(
                operation.clone(),
                201,
                json!({ "id": calls.len() * 10 }),
            ))
        }
    }

    fn faculty(name: &str, sheet: &str, row: u32) -> Record {
        let mut record = Record::new(RecordKind::Faculty, sheet, row);
        record.set("name", FieldValue::Text(name.into()));
        record
    }

    fn roster(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| {
                let sheet = if i % 2 == 0 { "GROUP A1" } else { "GROUP B" };
                faculty(&format!("Faculty {}", i), sheet, 10 + i as u32)
            })
            .collect()
    }

    fn with_institution() -> SubmitOptions {
        SubmitOptions {
            institution_id: Some("7".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_one_call_per_record_and_progress_ends_at_100() {
        let executor = RecordingExecutor::default();
        let records = roster(5);
        let mut seen = Vec::new();

        let report = submit(&executor, &records, &with_institution(), &mut |p| {
            seen.push(p)
        })
        .await
        .unwrap();

        assert_eq!(executor.calls().len(), 5);
        assert_eq!(report.calls, 5);
        assert_eq!(report.submitted, 5);

        let percents: Vec<u8> = seen.iter().map(|p| p.percent()).collect();
        assert_eq!(percents, vec![0, 20, 40, 60, 80, 100]);
        // 100% is only reported by the last update
        assert!(seen[..seen.len() - 1].iter().all(|p| p.percent() < 100));
    }

    #[tokio::test]
    async fn test_payload_carries_institution_id() {
        let executor = RecordingExecutor::default();
        submit(&executor, &roster(1), &with_institution(), &mut |_| {})
            .await
            .unwrap();

        let calls = executor.calls();
        let body = calls[0].body().unwrap();
        assert_eq!(body["institution_id"], "7");
        assert_eq!(body["name"], "Faculty 0");
        assert_eq!(calls[0].path(), "faculty-profiles");
    }

    #[tokio::test]
    async fn test_failure_aborts_and_reports_server_message() {
        let executor = RecordingExecutor::failing_on(3);
        let mut last = None;

        let err = submit(&executor, &roster(5), &with_institution(), &mut |p| {
            last = Some(p)
        })
        .await
        .unwrap_err();

        assert_eq!(executor.calls().len(), 3);
        match &err {
            SubmitError::Failed {
                completed,
                total,
                location,
                ..
            } => {
                assert_eq!(*completed, 2);
                assert_eq!(*total, 5);
                assert_eq!(location, "GROUP A1!R12");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("The name has already been taken."));
        assert_eq!(last.unwrap().percent(), 40);
    }

    #[tokio::test]
    async fn test_invalid_record_blocks_submission() {
        let executor = RecordingExecutor::default();
        let mut records = roster(3);
        records[1].set("research_load", FieldValue::Decimal(-1.0));

        let err = submit(&executor, &records, &with_institution(), &mut |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, SubmitError::Invalid { ref issues } if issues.len() == 1));
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_members_need_an_institution() {
        let executor = RecordingExecutor::default();
        let err = submit(&executor, &roster(2), &SubmitOptions::default(), &mut |_| {})
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SubmitError::NoInstitution {
                kind: RecordKind::Faculty
            }
        ));
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_mode_chunks_records() {
        let executor = RecordingExecutor::default();
        let options = SubmitOptions {
            mode: SubmitMode::Bulk,
            batch_size: 2,
            ..with_institution()
        };
        let mut seen = Vec::new();

        let report = submit(&executor, &roster(5), &options, &mut |p| seen.push(p))
            .await
            .unwrap();

        let calls = executor.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(report.calls, 3);
        assert_eq!(report.submitted, 5);
        assert_eq!(calls[0].path(), "faculty-profiles/bulk");
        assert_eq!(calls[2].record_count(), 1);
        let completed: Vec<usize> = seen.iter().map(|p| p.completed).collect();
        assert_eq!(completed, vec![0, 2, 4, 5]);
    }

    #[tokio::test]
    async fn test_form_a_creates_institution_then_campuses() {
        let executor = RecordingExecutor::default();

        let mut institution = Record::new(RecordKind::Institution, "A1", 6);
        institution.set("uii", FieldValue::Text("13001".into()));
        institution.set("name", FieldValue::Text("Northern Luzon State University".into()));
        let mut campus = Record::new(RecordKind::Campus, "A2", 14);
        campus.set("name", FieldValue::Text("Main Campus".into()));
        let records = vec![institution, campus];

        let report = submit(&executor, &records, &SubmitOptions::default(), &mut |_| {})
            .await
            .unwrap();

        let calls = executor.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].path(), "institutions");
        assert_eq!(calls[1].path(), "campuses");
        // The recording executor hands out id 10 for the first call
        assert_eq!(calls[1].body().unwrap()["institution_id"], "10");
        assert_eq!(report.institution_id.as_deref(), Some("10"));
    }

    #[tokio::test]
    async fn test_existing_institution_is_updated() {
        let executor = RecordingExecutor::default();
        let mut institution = Record::new(RecordKind::Institution, "A1", 6);
        institution.set("uii", FieldValue::Text("13001".into()));
        institution.set("name", FieldValue::Text("NLSU".into()));

        submit(&executor, &[institution], &with_institution(), &mut |_| {})
            .await
            .unwrap();

        let calls = executor.calls();
        assert_eq!(calls[0].path(), "institutions/7");
        assert_eq!(calls[0].operation_type(), "update");
    }

    fn graduates_workbook(rows: usize) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("heireport-submit-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("graduates.xlsx");

        let mut workbook = Workbook::new();
        let ws = workbook.add_worksheet();
        ws.write_string(0, 0, "Student ID").unwrap();
        for i in 0..rows {
            let row = (i + 1) as u32;
            ws.write_string(row, 0, format!("2020-{:04}", i)).unwrap();
            ws.write_string(row, 2, "Cruz").unwrap();
            ws.write_string(row, 3, "Ana").unwrap();
            ws.write_number(row, 5, 2).unwrap();
        }
        workbook.save(&path).unwrap();
        path
    }

    #[tokio::test]
    async fn test_oversized_upload_never_reaches_the_api() {
        let executor = RecordingExecutor::default();
        let path = graduates_workbook(3);
        let policy = UploadPolicy::new(16);

        let err = upload_workbook(
            &executor,
            &path,
            &Template::load(TemplateId::Graduates),
            &policy,
            &with_institution(),
            &mut |_| true,
            &mut |_| {},
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<UploadError>(),
            Some(UploadError::TooLarge { .. })
        ));
        assert!(executor.calls().is_empty());
    }

    #[tokio::test]
    async fn test_upload_pipeline_submits_every_valid_row() {
        let executor = RecordingExecutor::default();
        let path = graduates_workbook(4);
        let mut final_progress = None;

        let outcome = upload_workbook(
            &executor,
            &path,
            &Template::load(TemplateId::Graduates),
            &UploadPolicy::default(),
            &with_institution(),
            &mut |mapped| mapped.records.len() == 4,
            &mut |p| final_progress = Some(p),
        )
        .await
        .unwrap();

        assert_eq!(outcome.report.unwrap().submitted, 4);
        assert_eq!(executor.calls().len(), 4);
        assert_eq!(final_progress.unwrap().percent(), 100);
    }

    #[tokio::test]
    async fn test_declined_or_dry_run_sends_nothing() {
        let executor = RecordingExecutor::default();
        let path = graduates_workbook(2);
        let template = Template::load(TemplateId::Graduates);

        let declined = upload_workbook(
            &executor,
            &path,
            &template,
            &UploadPolicy::default(),
            &with_institution(),
            &mut |_| false,
            &mut |_| {},
        )
        .await
        .unwrap();
        assert!(declined.report.is_none());

        let dry_run = SubmitOptions {
            dry_run: true,
            ..with_institution()
        };
        let outcome = upload_workbook(
            &executor,
            &path,
            &template,
            &UploadPolicy::default(),
            &dry_run,
            &mut |_| true,
            &mut |_| {},
        )
        .await
        .unwrap();
        assert_eq!(outcome.mapped.records.len(), 2);
        assert!(outcome.report.is_none());
        assert!(executor.calls().is_empty());
    }
}
