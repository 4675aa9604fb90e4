//! Session controller: owns all mapping state and its transitions.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::decision::DecisionStore;
use crate::error::{ColmapError, Result};
use crate::export::{DownloadSink, ExportArtifact, Exporter};
use crate::input::{Dataset, Parser, SourceMetadata};
use crate::selection::{ColumnSelector, EligibleColumn, SelectedColumns};
use crate::suggestion::{SuggestionClient, SuggestionRequest, SuggestionSet};
use crate::transform::{TransformEngine, TransformResult};

use super::config::SessionConfig;
use super::phase::{Notice, Phase, SuggestionTicket};
use super::view::{AppliedView, DecisionView, SessionView};

#[derive(Debug, Clone)]
struct PendingRequest {
    ticket: SuggestionTicket,
    request: SuggestionRequest,
}

/// One user's mapping workflow, from upload to download.
///
/// Every action checks the current [`Phase`] first. An action that fails
/// leaves the session as it was and records [`Notice::Error`].
#[derive(Debug)]
pub struct MappingSession {
    config: SessionConfig,
    selector: ColumnSelector,
    parser: Parser,
    exporter: Exporter,
    engine: TransformEngine,

    phase: Phase,
    source: Option<SourceMetadata>,
    dataset: Option<Dataset>,
    selected: SelectedColumns,
    suggestions: SuggestionSet,
    decisions: DecisionStore,
    transformed: Option<TransformResult>,
    pending: Option<PendingRequest>,
    next_ticket: u64,
    notice: Option<Notice>,
}

impl MappingSession {
    /// Create a session with default configuration.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    /// Create a session with custom configuration.
    pub fn with_config(config: SessionConfig) -> Self {
        Self {
            selector: config.selector(),
            parser: config.build_parser(),
            exporter: config.exporter(),
            engine: TransformEngine::new(),
            config,
            phase: Phase::AwaitingFile,
            source: None,
            dataset: None,
            selected: SelectedColumns::new(),
            suggestions: SuggestionSet::new(),
            decisions: DecisionStore::new(),
            transformed: None,
            pending: None,
            next_ticket: 0,
            notice: None,
        }
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Metadata of the loaded file.
    pub fn source(&self) -> Option<&SourceMetadata> {
        self.source.as_ref()
    }

    /// The loaded dataset, unmodified.
    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Selected columns.
    pub fn selected(&self) -> &SelectedColumns {
        &self.selected
    }

    /// Suggestions under review.
    pub fn suggestions(&self) -> &SuggestionSet {
        &self.suggestions
    }

    /// Current decisions.
    pub fn decisions(&self) -> &DecisionStore {
        &self.decisions
    }

    /// Result of the last apply.
    pub fn transformed(&self) -> Option<&TransformResult> {
        self.transformed.as_ref()
    }

    /// Last notice.
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Whether a suggestion request is outstanding.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Ticket of the outstanding request, if any.
    pub fn pending_ticket(&self) -> Option<&SuggestionTicket> {
        self.pending.as_ref().map(|p| &p.ticket)
    }

    /// Columns the user may select. Empty until a file is loaded.
    pub fn eligible_columns(&self) -> Vec<EligibleColumn> {
        self.dataset
            .as_ref()
            .map(|ds| self.selector.eligible(ds))
            .unwrap_or_default()
    }

    /// Load an uploaded file, replacing any previous one.
    ///
    /// Selection, suggestions, decisions, and any pending request are
    /// dropped. On failure the previous file stays loaded.
    pub fn load_file(&mut self, file: &str, contents: &[u8]) -> Result<()> {
        self.notice = None;
        let result = self.try_load_file(file, contents);
        self.record(result)
    }

    /// Load a file from disk.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = match fs::read(path) {
            Ok(c) => c,
            Err(e) => {
                return self.record(Err(ColmapError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }));
            }
        };
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.load_file(&file, &contents)
    }

    fn try_load_file(&mut self, file: &str, contents: &[u8]) -> Result<()> {
        self.require(&[Phase::AwaitingFile, Phase::SelectingColumns], "load a file")?;

        let (dataset, source) = self.parser.parse_upload(file, contents)?;
        info!(
            file = %source.file,
            rows = source.row_count,
            columns = source.column_count,
            eligible = self.selector.eligible(&dataset).len(),
            "loaded file"
        );

        self.selected.clear();
        self.clear_review();
        self.pending = None;
        self.dataset = Some(dataset);
        self.source = Some(source);
        self.transition(Phase::SelectingColumns);
        Ok(())
    }

    /// Select or deselect a column. Returns whether it is selected afterwards.
    pub fn toggle_column(&mut self, name: &str) -> Result<bool> {
        self.notice = None;
        let result = self.try_toggle_column(name);
        self.record(result)
    }

    fn try_toggle_column(&mut self, name: &str) -> Result<bool> {
        self.require(&[Phase::SelectingColumns], "change the column selection")?;
        let dataset = self.loaded()?;

        if !self.selected.contains(name) && !self.selector.is_eligible(dataset, name) {
            return Err(ColmapError::Validation(format!(
                "column '{}' has no values to map",
                name
            )));
        }

        let selected = self.selected.toggle(name);
        debug!(column = name, selected, total = self.selected.len(), "toggled column");
        Ok(selected)
    }

    /// Build the request for the current selection and mark it outstanding.
    ///
    /// Fails with [`ColmapError::Busy`] while a request for the same
    /// selection is outstanding. A request for a different selection
    /// supersedes the earlier one.
    pub fn begin_submission(&mut self) -> Result<(SuggestionTicket, SuggestionRequest)> {
        self.notice = None;
        let result = self.try_begin_submission();
        self.record(result)
    }

    fn try_begin_submission(&mut self) -> Result<(SuggestionTicket, SuggestionRequest)> {
        self.require(&[Phase::SelectingColumns], "request suggestions")?;
        if self.selected.is_empty() {
            return Err(ColmapError::EmptySelection);
        }

        if self
            .pending
            .as_ref()
            .is_some_and(|p| self.selected.same_fields(&p.ticket.columns))
        {
            return Err(ColmapError::Busy);
        }

        let dataset = self.loaded()?;
        let request = SuggestionRequest::build(dataset, &self.selected, self.selector.window());

        self.next_ticket += 1;
        let ticket = SuggestionTicket {
            id: self.next_ticket,
            columns: self.selected.snapshot(),
        };
        if let Some(old) = self.pending.replace(PendingRequest {
            ticket: ticket.clone(),
            request: request.clone(),
        }) {
            debug!(superseded = old.ticket.id, "superseded pending request");
        }

        debug!(ticket = ticket.id, columns = request.len(), "suggestion request ready");
        Ok((ticket, request))
    }

    /// Accept the outcome of a request started with [`begin_submission`].
    ///
    /// Responses for superseded tickets, or arriving after the selection
    /// changed, are discarded with [`ColmapError::StaleResponse`] and change
    /// nothing. A failed or incomplete response clears the pending request
    /// and keeps the selection so the user can resubmit.
    ///
    /// [`begin_submission`]: MappingSession::begin_submission
    pub fn complete_submission(
        &mut self,
        ticket: SuggestionTicket,
        result: Result<SuggestionSet>,
    ) -> Result<()> {
        let is_current = self
            .pending
            .as_ref()
            .is_some_and(|p| p.ticket.id == ticket.id);
        if !is_current {
            warn!(ticket = ticket.id, "discarding response for superseded request");
            return Err(ColmapError::StaleResponse);
        }

        if self.phase != Phase::SelectingColumns || !self.selected.same_fields(&ticket.columns) {
            self.pending = None;
            warn!(ticket = ticket.id, "discarding response for changed selection");
            return Err(ColmapError::StaleResponse);
        }

        let Some(pending) = self.pending.take() else {
            return Err(ColmapError::StaleResponse);
        };

        self.notice = None;
        let outcome = result.and_then(|set| {
            set.ensure_covers(&pending.request)?;
            Ok(set)
        });

        match outcome {
            Ok(set) => {
                info!(
                    ticket = ticket.id,
                    requested = pending.request.len(),
                    received = set.len(),
                    "received suggestions"
                );
                self.decisions = DecisionStore::seed(&set);
                self.suggestions = set;
                self.transition(Phase::ReviewingSuggestions);
                Ok(())
            }
            Err(e) => self.record(Err(e)),
        }
    }

    /// Request suggestions and wait for them.
    pub fn submit(&mut self, client: &dyn SuggestionClient) -> Result<()> {
        let (ticket, request) = self.begin_submission()?;
        info!(client = client.name(), columns = request.len(), "requesting suggestions");
        let result = client.request_suggestions(&request);
        self.complete_submission(ticket, result)
    }

    /// Flip acceptance of a suggestion.
    pub fn toggle_acceptance(&mut self, key: &str) -> Result<()> {
        self.notice = None;
        let result = self
            .require(&[Phase::ReviewingSuggestions], "change decisions")
            .and_then(|_| self.decisions.toggle_acceptance(key).map(|_| ()));
        self.record(result)
    }

    /// Choose the primary or one of the alternatives for a suggestion.
    pub fn select_alternative(&mut self, key: &str, candidate: &str) -> Result<()> {
        self.notice = None;
        let result = match self.require(&[Phase::ReviewingSuggestions], "change decisions") {
            Ok(()) => self
                .decisions
                .select_alternative(key, candidate, &self.suggestions)
                .map(|_| ()),
            Err(e) => Err(e),
        };
        self.record(result)
    }

    /// Apply accepted decisions. Returns the number of mappings applied.
    pub fn apply(&mut self) -> Result<usize> {
        self.notice = None;
        let result = self.try_apply();
        self.record(result)
    }

    fn try_apply(&mut self) -> Result<usize> {
        self.require(&[Phase::ReviewingSuggestions], "apply mappings")?;
        let dataset = self.loaded()?;

        let result = self.engine.apply(dataset, &self.selected, &self.decisions);
        let applied = result.applied_count;

        self.transformed = Some(result);
        self.notice = Some(Notice::Success(format!(
            "Successfully mapped {} values!",
            applied
        )));
        self.transition(Phase::Applied);
        Ok(applied)
    }

    /// Serialize the mapped dataset and hand it to `sink`.
    pub fn export(&mut self, sink: &dyn DownloadSink) -> Result<ExportArtifact> {
        let result = self.try_export(sink);
        self.record(result)
    }

    fn try_export(&self, sink: &dyn DownloadSink) -> Result<ExportArtifact> {
        self.require(&[Phase::Applied], "download")?;
        let (Some(transformed), Some(source)) = (&self.transformed, &self.source) else {
            return Err(self.phase_error("download"));
        };
        self.exporter.export(&transformed.dataset, &source.file, sink)
    }

    /// Return to column selection, keeping the file and the selection.
    pub fn back_to_selection(&mut self) -> Result<()> {
        self.notice = None;
        let result = self.require(
            &[Phase::ReviewingSuggestions, Phase::Applied],
            "go back to column selection",
        );
        if result.is_ok() {
            self.clear_review();
            self.pending = None;
            self.transition(Phase::SelectingColumns);
        }
        self.record(result)
    }

    /// Drop everything and wait for a new file.
    pub fn start_over(&mut self) {
        self.source = None;
        self.dataset = None;
        self.selected.clear();
        self.clear_review();
        self.pending = None;
        self.notice = None;
        self.transition(Phase::AwaitingFile);
    }

    /// Snapshot for rendering.
    pub fn view(&self) -> SessionView {
        let decisions = self
            .decisions
            .iter()
            .map(|(key, decision)| DecisionView {
                key: key.to_string(),
                choices: self
                    .suggestions
                    .get(key)
                    .map(|s| s.choices().into_iter().map(str::to_string).collect())
                    .unwrap_or_default(),
                accepted: decision.accepted,
                selected_mapping: decision.selected_mapping.clone(),
            })
            .collect();

        let applied = self
            .transformed
            .as_ref()
            .zip(self.source.as_ref())
            .map(|(t, s)| AppliedView {
                applied_count: t.applied_count,
                cells_rewritten: t.cells_rewritten,
                output_file: self.exporter.output_file_name(&s.file),
            });

        SessionView {
            phase: self.phase,
            step: self.phase.step(),
            source: self.source.clone(),
            field_names: self
                .dataset
                .as_ref()
                .map(|d| d.field_names().to_vec())
                .unwrap_or_default(),
            eligible: self.eligible_columns(),
            selected: self.selected.snapshot(),
            decisions,
            summary: self.decisions.summary(),
            applied,
            notice: self.notice.clone(),
            busy: self.is_busy(),
        }
    }

    fn loaded(&self) -> Result<&Dataset> {
        self.dataset
            .as_ref()
            .ok_or_else(|| self.phase_error("continue without a file"))
    }

    fn clear_review(&mut self) {
        self.suggestions = SuggestionSet::new();
        self.decisions.clear();
        self.transformed = None;
    }

    fn require(&self, allowed: &[Phase], action: &'static str) -> Result<()> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(self.phase_error(action))
        }
    }

    fn phase_error(&self, action: &'static str) -> ColmapError {
        ColmapError::InvalidPhase {
            action,
            phase: self.phase.to_string(),
        }
    }

    fn transition(&mut self, to: Phase) {
        if self.phase != to {
            info!(from = %self.phase, to = %to, "session phase changed");
        }
        self.phase = to;
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            warn!(error = %e, phase = %self.phase, "action failed");
            self.notice = Some(Notice::Error(e.to_string()));
        }
        result
    }
}

impl Default for MappingSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemorySink;
    use crate::suggestion::{MockSuggestionClient, Suggestion};

    const CSV: &[u8] = b"Variable / Field Name,Field Label\n\
        record_id,Record ID\n\
        age,Age\n\
        sex,Sex\n";

    fn loaded() -> MappingSession {
        let mut session = MappingSession::new();
        session.load_file("dict.csv", CSV).unwrap();
        session
    }

    #[test]
    fn test_new_session_awaits_file() {
        let session = MappingSession::new();
        assert_eq!(session.phase(), Phase::AwaitingFile);
        assert!(session.eligible_columns().is_empty());
        assert_eq!(session.view().step, 1);
    }

    #[test]
    fn test_bad_extension_records_notice() {
        let mut session = MappingSession::new();
        let err = session.load_file("dict.txt", CSV).unwrap_err();

        assert!(matches!(err, ColmapError::FileFormat(_)));
        assert_eq!(session.phase(), Phase::AwaitingFile);
        assert_eq!(
            session.notice(),
            Some(&Notice::Error("Please upload a valid CSV file".to_string()))
        );
    }

    #[test]
    fn test_toggle_requires_eligible_column() {
        let mut session = loaded();
        assert!(session.toggle_column("Variable / Field Name").unwrap());
        assert!(session.toggle_column("Field Label").is_err());
        assert!(!session.toggle_column("Variable / Field Name").unwrap());
    }

    #[test]
    fn test_submit_without_selection() {
        let mut session = loaded();
        let err = session.submit(&MockSuggestionClient::new()).unwrap_err();

        assert!(matches!(err, ColmapError::EmptySelection));
        assert_eq!(
            session.notice().map(Notice::message),
            Some("Please select at least one column")
        );
    }

    #[test]
    fn test_decision_actions_need_review_phase() {
        let mut session = loaded();
        let err = session.toggle_acceptance("age").unwrap_err();
        assert!(matches!(err, ColmapError::InvalidPhase { .. }));
        assert!(session.apply().is_err());
        assert!(session.back_to_selection().is_err());
    }

    #[test]
    fn test_full_cycle() {
        let client = MockSuggestionClient::new()
            .with_suggestion("age", Suggestion::new("age_years"))
            .echo_samples(true);
        let mut session = loaded();
        session.toggle_column("Variable / Field Name").unwrap();
        session.submit(&client).unwrap();
        assert_eq!(session.phase(), Phase::ReviewingSuggestions);

        assert_eq!(session.apply().unwrap(), 3);
        assert_eq!(
            session.notice(),
            Some(&Notice::Success("Successfully mapped 3 values!".to_string()))
        );

        let sink = MemorySink::new();
        let artifact = session.export(&sink).unwrap();
        assert_eq!(artifact.file_name, "mapped_dict.csv");
        assert!(artifact.contents.contains("age_years,Age"));
        assert!(artifact.contents.contains("record_id,Record ID"));

        session.start_over();
        assert_eq!(session.phase(), Phase::AwaitingFile);
        assert!(session.dataset().is_none());
        assert!(session.selected().is_empty());
    }
}
