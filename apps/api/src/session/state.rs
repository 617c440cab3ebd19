//! Optimization session: the per-unit state machine over a private working copy.
//!
//! Unit states: untouched → pending-options → (accepted | rejected); a rejected
//! unit re-enters pending-options via regenerate. Session states: open →
//! finalized | abandoned, both terminal.
//!
//! Every mutating call re-checks state before acting and either applies all of
//! its changes or none of them. The session never touches storage.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::options::{generate_options, OptionGenerator, OptionRequest, OptionSet};
use crate::models::resume::{ContentUnit, ResumeDocument, UnitId, UnitKind};
use crate::scoring::engine::{score, score_unit, ScoreReport, ScoringConfig, UnitScore, Weakness};
use crate::scoring::jd_parser::JobDescription;

// ────────────────────────────────────────────────────────────────────────────
// State types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitStatus {
    Untouched,
    PendingOptions,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Open,
    Finalized,
    Abandoned,
}

#[derive(Debug, Clone)]
struct UnitState {
    status: UnitStatus,
    /// Last generation round; 0 before the first.
    round: u32,
    current: Option<OptionSet>,
    /// Every candidate text ever shown for this unit, in order.
    shown: Vec<String>,
}

impl UnitState {
    fn new() -> Self {
        Self {
            status: UnitStatus::Untouched,
            round: 0,
            current: None,
            shown: vec![],
        }
    }
}

/// How the caller picks a candidate: by position in the current set or by text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandidateSelector {
    Index(usize),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum GenerationMode {
    Generate,
    Regenerate,
}

#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub count: usize,
    pub feedback: Option<String>,
    pub timeout: Duration,
}

// ────────────────────────────────────────────────────────────────────────────
// Results
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct AcceptResult {
    pub unit_id: UnitId,
    pub previous_text: String,
    pub accepted_text: String,
    pub unit_score_before: UnitScore,
    pub unit_score_after: UnitScore,
}

#[derive(Debug, Clone, Serialize)]
pub struct NextOptimization {
    pub unit: ContentUnit,
    pub status: UnitStatus,
    pub weaknesses: Vec<Weakness>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitSummary {
    pub unit_id: UnitId,
    pub kind: UnitKind,
    pub context: String,
    pub text: String,
    pub status: UnitStatus,
    pub round: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub status: SessionStatus,
    pub source_resume_id: Option<Uuid>,
    pub baseline_score: f64,
    /// `None` once the working copy has been discarded.
    pub current_score: Option<f64>,
    pub units: Vec<UnitSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinalizeResult {
    pub document: ResumeDocument,
    pub baseline: ScoreReport,
    pub report: ScoreReport,
}

// ────────────────────────────────────────────────────────────────────────────
// Session
// ────────────────────────────────────────────────────────────────────────────

pub struct OptimizationSession {
    id: Uuid,
    source_resume_id: Option<Uuid>,
    status: SessionStatus,
    /// Discarded on abandon.
    working: Option<ResumeDocument>,
    job: JobDescription,
    config: ScoringConfig,
    baseline: ScoreReport,
    units: BTreeMap<UnitId, UnitState>,
    /// Overall score of the finalized document.
    final_score: Option<f64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OptimizationSession {
    /// Opens a session over a private copy of `document` and scores it.
    pub fn start(
        document: ResumeDocument,
        job_text: &str,
        config: ScoringConfig,
        source_resume_id: Option<Uuid>,
    ) -> Result<Self, AppError> {
        let job = JobDescription::parse(job_text)?;
        let baseline = score(&document, &job, &config)?;
        let units = document
            .content_units()
            .into_iter()
            .map(|u| (u.id, UnitState::new()))
            .collect();
        let now = Utc::now();
        let session = Self {
            id: Uuid::new_v4(),
            source_resume_id,
            status: SessionStatus::Open,
            working: Some(document),
            job,
            config,
            baseline,
            units,
            final_score: None,
            created_at: now,
            updated_at: now,
        };
        info!(
            "Session {} opened: baseline {:.1}, {} content units",
            session.id,
            session.baseline.overall,
            session.units.len()
        );
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn source_resume_id(&self) -> Option<Uuid> {
        self.source_resume_id
    }

    pub fn baseline(&self) -> &ScoreReport {
        &self.baseline
    }

    #[cfg(test)]
    pub fn job(&self) -> &JobDescription {
        &self.job
    }

    #[cfg(test)]
    pub fn unit_status(&self, unit_id: UnitId) -> Option<UnitStatus> {
        self.units.get(&unit_id).map(|u| u.status)
    }

    #[cfg(test)]
    pub fn current_options(&self, unit_id: UnitId) -> Option<&OptionSet> {
        self.units.get(&unit_id).and_then(|u| u.current.as_ref())
    }

    /// Read-only view of the working copy while the session is open.
    pub fn working_document(&self) -> Result<&ResumeDocument, AppError> {
        self.ensure_open()?;
        self.working
            .as_ref()
            .ok_or_else(|| AppError::InvalidState(format!("Session {} has no working document", self.id)))
    }

    /// First options for a unit. Allowed unless the unit is accepted; a unit that
    /// already has options moves to the next round so nothing shown repeats.
    pub async fn generate_options(
        &mut self,
        generator: &dyn OptionGenerator,
        unit_id: UnitId,
        params: &GenerationParams,
    ) -> Result<&OptionSet, AppError> {
        self.run_generation(generator, unit_id, params, GenerationMode::Generate)
            .await
    }

    /// Next round for a unit in pending-options or rejected, excluding every text shown so far.
    pub async fn regenerate_options(
        &mut self,
        generator: &dyn OptionGenerator,
        unit_id: UnitId,
        params: &GenerationParams,
    ) -> Result<&OptionSet, AppError> {
        self.run_generation(generator, unit_id, params, GenerationMode::Regenerate)
            .await
    }

    async fn run_generation(
        &mut self,
        generator: &dyn OptionGenerator,
        unit_id: UnitId,
        params: &GenerationParams,
        mode: GenerationMode,
    ) -> Result<&OptionSet, AppError> {
        let round = self.check_generation(unit_id, mode)?;
        let working = self.working_document()?;
        let exclude = self
            .units
            .get(&unit_id)
            .map(|u| u.shown.clone())
            .unwrap_or_default();

        let request = OptionRequest {
            unit_id,
            document: working,
            job: &self.job,
            round,
            exclude_texts: &exclude,
            count: params.count,
            feedback: params.feedback.as_deref(),
        };
        let set = match tokio::time::timeout(
            params.timeout,
            generate_options(generator, &request, &self.config),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    "Session {}: {} generation for unit {unit_id} exceeded {:?}",
                    self.id,
                    generator.name(),
                    params.timeout
                );
                return Err(AppError::Timeout(format!(
                    "Option generation for unit {unit_id} exceeded {}s",
                    params.timeout.as_secs_f64()
                )));
            }
        };

        // Re-check: nothing may have moved, but commit only from a legal state.
        self.check_generation(unit_id, mode)?;
        let session_id = self.id;
        let state = self
            .units
            .get_mut(&unit_id)
            .ok_or_else(|| AppError::NotFound(format!("Content unit {unit_id} not found")))?;
        state.status = UnitStatus::PendingOptions;
        state.round = round;
        state
            .shown
            .extend(set.candidates.iter().map(|c| c.text.clone()));
        info!(
            "Session {session_id}: unit {unit_id} round {round} has {} option(s){}",
            set.candidates.len(),
            if set.warning.is_some() { " (partial)" } else { "" }
        );
        self.updated_at = Utc::now();
        Ok(&*state.current.insert(set))
    }

    /// Validates a generation call and returns the round it would run.
    fn check_generation(&self, unit_id: UnitId, mode: GenerationMode) -> Result<u32, AppError> {
        self.ensure_open()?;
        let state = self.unit_state(unit_id)?;
        let allowed = match mode {
            GenerationMode::Generate => state.status != UnitStatus::Accepted,
            GenerationMode::Regenerate => matches!(
                state.status,
                UnitStatus::PendingOptions | UnitStatus::Rejected
            ),
        };
        if !allowed {
            return Err(AppError::InvalidState(format!(
                "Cannot {} options for unit {unit_id} in state {:?}",
                match mode {
                    GenerationMode::Generate => "generate",
                    GenerationMode::Regenerate => "regenerate",
                },
                state.status
            )));
        }
        Ok(state.round + 1)
    }

    /// Applies a candidate from the unit's current option set to the working copy.
    pub fn accept(
        &mut self,
        unit_id: UnitId,
        selector: &CandidateSelector,
    ) -> Result<AcceptResult, AppError> {
        self.ensure_open()?;
        let state = self.unit_state(unit_id)?;
        if state.status != UnitStatus::PendingOptions {
            return Err(AppError::InvalidState(format!(
                "Unit {unit_id} has no pending options (state {:?})",
                state.status
            )));
        }
        let set = state.current.as_ref().ok_or_else(|| {
            AppError::InvalidState(format!("Unit {unit_id} has no pending options"))
        })?;
        let chosen = match selector {
            CandidateSelector::Index(i) => set.candidates.get(*i),
            CandidateSelector::Text(text) => set.find(text),
        }
        .ok_or_else(|| {
            AppError::InvalidSelection(format!(
                "{selector:?} is not among the {} current options for unit {unit_id}",
                set.candidates.len()
            ))
        })?
        .text
        .clone();

        let working = self
            .working
            .as_mut()
            .ok_or_else(|| AppError::InvalidState("Session has no working document".to_string()))?;
        let unit = working
            .unit(unit_id)
            .ok_or_else(|| AppError::NotFound(format!("Content unit {unit_id} not found")))?;
        working.replace_unit_text(unit_id, chosen.clone())?;
        working.touch();

        let before = score_unit(&unit.text, unit.kind, &self.job, &self.config);
        let after = score_unit(&chosen, unit.kind, &self.job, &self.config);
        if let Some(state) = self.units.get_mut(&unit_id) {
            state.status = UnitStatus::Accepted;
            state.current = None;
        }
        self.updated_at = Utc::now();
        info!(
            "Session {}: unit {unit_id} accepted ({:.1} -> {:.1})",
            self.id, before.composite, after.composite
        );
        Ok(AcceptResult {
            unit_id,
            previous_text: unit.text,
            accepted_text: chosen,
            unit_score_before: before,
            unit_score_after: after,
        })
    }

    /// Drops the unit's pending options; their texts stay excluded from later rounds.
    pub fn reject(&mut self, unit_id: UnitId) -> Result<UnitStatus, AppError> {
        self.ensure_open()?;
        let session_id = self.id;
        let state = self
            .units
            .get_mut(&unit_id)
            .ok_or_else(|| AppError::NotFound(format!("Content unit {unit_id} not found")))?;
        if state.status != UnitStatus::PendingOptions {
            return Err(AppError::InvalidState(format!(
                "Unit {unit_id} has no pending options to reject (state {:?})",
                state.status
            )));
        }
        state.status = UnitStatus::Rejected;
        state.current = None;
        self.updated_at = Utc::now();
        info!("Session {session_id}: unit {unit_id} rejected");
        Ok(UnitStatus::Rejected)
    }

    /// Units still untouched or rejected, highest priority first: most
    /// baseline weaknesses first, document order on ties.
    fn pending_queue(&self) -> Result<Vec<NextOptimization>, AppError> {
        let working = self.working_document()?;
        let mut queue: Vec<(usize, NextOptimization)> = working
            .content_units()
            .into_iter()
            .enumerate()
            .filter_map(|(order, unit)| {
                let status = self.units.get(&unit.id)?.status;
                matches!(status, UnitStatus::Untouched | UnitStatus::Rejected)
                    .then_some((order, unit, status))
            })
            .map(|(order, unit, status)| {
                let weaknesses: Vec<Weakness> =
                    self.baseline.weaknesses_for(unit.id).cloned().collect();
                (
                    order,
                    NextOptimization {
                        unit,
                        status,
                        weaknesses,
                    },
                )
            })
            .collect();
        queue.sort_by(|a, b| {
            b.1.weaknesses
                .len()
                .cmp(&a.1.weaknesses.len())
                .then(a.0.cmp(&b.0))
        });
        Ok(queue.into_iter().map(|(_, next)| next).collect())
    }

    pub fn next_optimization(&self) -> Result<Option<NextOptimization>, AppError> {
        Ok(self.pending_queue()?.into_iter().next())
    }

    /// Passes over the current top unit and returns it with the one after it.
    /// Nothing is recorded, so the skipped unit comes back on the next plain call.
    pub fn skip_current(&self) -> Result<(Option<UnitId>, Option<NextOptimization>), AppError> {
        let mut queue = self.pending_queue()?.into_iter();
        let skipped = queue.next().map(|n| n.unit.id);
        Ok((skipped, queue.next()))
    }

    /// Re-scores the working copy and closes the session. Only the first call succeeds.
    pub fn finalize(&mut self) -> Result<FinalizeResult, AppError> {
        let result = self.prepare_finalize()?;
        self.mark_finalized(&result.report)?;
        Ok(result)
    }

    /// Final document and report without closing the session. The document
    /// carries a new score-history record.
    pub fn prepare_finalize(&self) -> Result<FinalizeResult, AppError> {
        let mut document = self.working_document()?.clone();
        let report = score(&document, &self.job, &self.config)?;
        document.meta.score_history.push(report.to_record(Utc::now()));
        document.touch();
        Ok(FinalizeResult {
            document,
            baseline: self.baseline.clone(),
            report,
        })
    }

    /// Closes the session after a successful `prepare_finalize`.
    pub fn mark_finalized(&mut self, report: &ScoreReport) -> Result<(), AppError> {
        self.ensure_open()?;
        self.final_score = Some(report.overall);
        self.close(SessionStatus::Finalized);
        info!("Session {} finalized", self.id);
        Ok(())
    }

    /// Discards the working copy. Allowed from any non-terminal state.
    pub fn abandon(&mut self) -> Result<(), AppError> {
        self.ensure_open()?;
        self.close(SessionStatus::Abandoned);
        info!("Session {} abandoned", self.id);
        Ok(())
    }

    /// Terminal sessions keep only their status and scores.
    fn close(&mut self, status: SessionStatus) {
        self.status = status;
        self.working = None;
        self.units.clear();
        self.updated_at = Utc::now();
    }

    pub fn summary(&self) -> Result<SessionSummary, AppError> {
        let current_score = match &self.working {
            Some(doc) => Some(score(doc, &self.job, &self.config)?.overall),
            None => self.final_score,
        };
        let units = match &self.working {
            Some(doc) => doc
                .content_units()
                .into_iter()
                .filter_map(|u| {
                    let state = self.units.get(&u.id)?;
                    Some(UnitSummary {
                        unit_id: u.id,
                        kind: u.kind,
                        context: u.context,
                        text: u.text,
                        status: state.status,
                        round: state.round,
                    })
                })
                .collect(),
            None => vec![],
        };
        Ok(SessionSummary {
            session_id: self.id,
            status: self.status,
            source_resume_id: self.source_resume_id,
            baseline_score: self.baseline.overall,
            current_score,
            units,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }

    fn ensure_open(&self) -> Result<(), AppError> {
        match self.status {
            SessionStatus::Open => Ok(()),
            other => Err(AppError::InvalidState(format!(
                "Session {} is {:?}",
                self.id, other
            ))),
        }
    }

    fn unit_state(&self, unit_id: UnitId) -> Result<&UnitState, AppError> {
        self.units
            .get(&unit_id)
            .ok_or_else(|| AppError::NotFound(format!("Content unit {unit_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;

    use super::*;
    use crate::generation::options::{normalize, StrategyInput};
    use crate::generation::rewrite::RuleBasedGenerator;
    use crate::scoring::engine::Criterion;

    const JD: &str = "Backend engineer. Requirements: distributed systems, Kubernetes.";

    struct SlowGenerator;

    #[async_trait]
    impl OptionGenerator for SlowGenerator {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn propose(&self, _input: &StrategyInput<'_>) -> Result<Vec<String>, AppError> {
            tokio::time::sleep(Duration::from_secs(600)).await;
            Ok(vec!["Too late".to_string()])
        }
    }

    fn params() -> GenerationParams {
        GenerationParams {
            count: 3,
            feedback: None,
            timeout: Duration::from_secs(5),
        }
    }

    fn document() -> (ResumeDocument, UnitId, UnitId, UnitId) {
        let mut doc = ResumeDocument::new("Ada Lovelace");
        let summary = doc.set_summary("Backend engineer who builds reliable services");
        let work = doc.add_work("Acme", "Backend Engineer");
        let weak = doc.add_work_highlight(work, "Worked on backend systems").unwrap();
        let strong = doc
            .add_work_highlight(work, "Reduced p99 latency by 40% by batching ledger writes")
            .unwrap();
        (doc, summary, weak, strong)
    }

    fn session() -> (OptimizationSession, UnitId, UnitId, UnitId) {
        let (doc, summary, weak, strong) = document();
        let s = OptimizationSession::start(doc, JD, ScoringConfig::default(), None).unwrap();
        (s, summary, weak, strong)
    }

    #[test]
    fn test_start_scores_and_marks_units_untouched() {
        let (s, summary, weak, strong) = session();
        assert_eq!(s.status(), SessionStatus::Open);
        for id in [summary, weak, strong] {
            assert_eq!(s.unit_status(id), Some(UnitStatus::Untouched));
        }
        assert!(s.baseline().weaknesses_for(weak).count() > 0);
    }

    #[test]
    fn test_start_rejects_empty_job_description() {
        let (doc, ..) = document();
        let err = OptimizationSession::start(doc, "", ScoringConfig::default(), None)
            .err()
            .unwrap();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_weak_bullet_improves_after_accept() {
        let (mut s, _, weak, _) = session();
        assert_eq!(s.baseline().criterion_score(Criterion::Quantification), 50.0);

        let set = s
            .generate_options(&RuleBasedGenerator, weak, &params())
            .await
            .unwrap()
            .clone();
        assert_eq!(s.unit_status(weak), Some(UnitStatus::PendingOptions));
        assert!(!set.candidates.is_empty());
        let job = s.job().clone();
        assert!(set.candidates.iter().any(|c| {
            crate::scoring::quantification::is_quantified(&c.text) || !job.keywords_in(&c.text).is_empty()
        }));

        let result = s.accept(weak, &CandidateSelector::Index(0)).unwrap();
        assert!(result.unit_score_after.composite > result.unit_score_before.composite);
        assert_eq!(s.unit_status(weak), Some(UnitStatus::Accepted));
    }

    #[tokio::test]
    async fn test_accept_changes_only_the_target_unit() {
        let (mut s, summary, weak, strong) = session();
        let before = s.working_document().unwrap().clone();
        s.generate_options(&RuleBasedGenerator, weak, &params())
            .await
            .unwrap();
        let result = s.accept(weak, &CandidateSelector::Index(1)).unwrap();
        let after = s.working_document().unwrap();
        assert_eq!(after.unit(weak).unwrap().text, result.accepted_text);
        for id in [summary, strong] {
            assert_eq!(after.unit(id).unwrap().text, before.unit(id).unwrap().text);
        }
    }

    #[tokio::test]
    async fn test_regeneration_never_repeats_shown_candidates() {
        let (mut s, _, weak, _) = session();
        let mut shown: HashSet<String> = HashSet::new();
        let first = s
            .generate_options(&RuleBasedGenerator, weak, &params())
            .await
            .unwrap()
            .clone();
        shown.extend(first.candidates.iter().map(|c| normalize(&c.text)));
        for round in 2..=5 {
            let set = s
                .regenerate_options(&RuleBasedGenerator, weak, &params())
                .await
                .unwrap()
                .clone();
            assert_eq!(set.round, round);
            for c in &set.candidates {
                assert!(shown.insert(normalize(&c.text)), "repeated: {}", c.text);
            }
        }
    }

    #[tokio::test]
    async fn test_reject_then_regenerate() {
        let (mut s, _, weak, _) = session();
        s.generate_options(&RuleBasedGenerator, weak, &params())
            .await
            .unwrap();
        assert_eq!(s.reject(weak).unwrap(), UnitStatus::Rejected);
        assert!(s.current_options(weak).is_none());
        let set = s
            .regenerate_options(&RuleBasedGenerator, weak, &params())
            .await
            .unwrap();
        assert_eq!(set.round, 2);
        assert_eq!(s.unit_status(weak), Some(UnitStatus::PendingOptions));
    }

    #[tokio::test]
    async fn test_illegal_transitions_are_state_errors() {
        let (mut s, _, weak, strong) = session();
        let err = s
            .regenerate_options(&RuleBasedGenerator, weak, &params())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        assert!(matches!(s.reject(strong), Err(AppError::InvalidState(_))));
        assert!(matches!(
            s.accept(strong, &CandidateSelector::Index(0)),
            Err(AppError::InvalidState(_))
        ));

        s.generate_options(&RuleBasedGenerator, weak, &params())
            .await
            .unwrap();
        s.accept(weak, &CandidateSelector::Index(0)).unwrap();
        let err = s
            .generate_options(&RuleBasedGenerator, weak, &params())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));
        assert!(matches!(
            s.accept(weak, &CandidateSelector::Index(0)),
            Err(AppError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_candidate_is_invalid_selection_and_changes_nothing() {
        let (mut s, _, weak, _) = session();
        s.generate_options(&RuleBasedGenerator, weak, &params())
            .await
            .unwrap();
        let before = s.working_document().unwrap().clone();
        let err = s
            .accept(weak, &CandidateSelector::Text("Invented text".to_string()))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidSelection(_)));
        assert!(matches!(
            s.accept(weak, &CandidateSelector::Index(99)),
            Err(AppError::InvalidSelection(_))
        ));
        assert_eq!(s.unit_status(weak), Some(UnitStatus::PendingOptions));
        assert_eq!(s.working_document().unwrap(), &before);
    }

    #[tokio::test]
    async fn test_accept_by_text() {
        let (mut s, _, weak, _) = session();
        let text = s
            .generate_options(&RuleBasedGenerator, weak, &params())
            .await
            .unwrap()
            .candidates[0]
            .text
            .clone();
        let result = s
            .accept(weak, &CandidateSelector::Text(text.to_uppercase()))
            .unwrap();
        assert_eq!(result.accepted_text, text);
    }

    #[tokio::test]
    async fn test_unknown_unit_is_not_found() {
        let (mut s, ..) = session();
        let err = s
            .generate_options(&RuleBasedGenerator, UnitId(999), &params())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_leaves_unit_state_unchanged() {
        let (mut s, _, weak, _) = session();
        let params = GenerationParams {
            timeout: Duration::from_millis(50),
            ..params()
        };
        let err = s.generate_options(&SlowGenerator, weak, &params).await.unwrap_err();
        assert!(matches!(err, AppError::Timeout(_)));
        assert_eq!(s.unit_status(weak), Some(UnitStatus::Untouched));
        assert!(s.current_options(weak).is_none());

        // Retry is safe.
        s.generate_options(&RuleBasedGenerator, weak, &self::params())
            .await
            .unwrap();
        assert_eq!(s.unit_status(weak), Some(UnitStatus::PendingOptions));
    }

    #[tokio::test]
    async fn test_finalize_exactly_once() {
        let (mut s, _, weak, _) = session();
        s.generate_options(&RuleBasedGenerator, weak, &params())
            .await
            .unwrap();
        s.accept(weak, &CandidateSelector::Index(0)).unwrap();
        let result = s.finalize().unwrap();
        assert_eq!(s.status(), SessionStatus::Finalized);
        assert_ne!(result.document.unit(weak).unwrap().text, "Worked on backend systems");
        assert!(result.report.overall > result.baseline.overall);
        assert_eq!(result.document.meta.score_history.len(), 1);
        assert_eq!(result.document.meta.score_history[0].overall, result.report.overall);
        assert!(matches!(s.finalize(), Err(AppError::InvalidState(_))));
        assert!(matches!(s.abandon(), Err(AppError::InvalidState(_))));
    }

    #[tokio::test]
    async fn test_finalized_session_keeps_only_a_tombstone() {
        let (mut s, _, weak, _) = session();
        s.generate_options(&RuleBasedGenerator, weak, &params())
            .await
            .unwrap();
        let result = s.finalize().unwrap();

        assert!(matches!(s.working_document(), Err(AppError::InvalidState(_))));
        assert!(s.current_options(weak).is_none());
        assert_eq!(s.unit_status(weak), None);
        let summary = s.summary().unwrap();
        assert_eq!(summary.status, SessionStatus::Finalized);
        assert_eq!(summary.current_score, Some(result.report.overall));
        assert!(summary.units.is_empty());
        assert!(matches!(
            s.generate_options(&RuleBasedGenerator, weak, &params()).await,
            Err(AppError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn test_abandon_discards_working_copy() {
        let (mut s, _, weak, _) = session();
        s.generate_options(&RuleBasedGenerator, weak, &params())
            .await
            .unwrap();
        s.abandon().unwrap();
        assert_eq!(s.status(), SessionStatus::Abandoned);
        assert!(matches!(s.working_document(), Err(AppError::InvalidState(_))));
        assert!(matches!(s.finalize(), Err(AppError::InvalidState(_))));
        assert!(matches!(s.abandon(), Err(AppError::InvalidState(_))));
        let summary = s.summary().unwrap();
        assert!(summary.current_score.is_none());
        assert!(summary.units.is_empty());
    }

    #[test]
    fn test_next_optimization_prefers_most_weaknesses() {
        let (s, _, weak, _) = session();
        let next = s.next_optimization().unwrap().unwrap();
        assert_eq!(next.unit.id, weak);
        assert_eq!(next.status, UnitStatus::Untouched);
        assert!(!next.weaknesses.is_empty());
    }

    #[test]
    fn test_skip_current_moves_on_without_state_change() {
        let (s, _, weak, _) = session();
        let (skipped, next) = s.skip_current().unwrap();
        assert_eq!(skipped, Some(weak));
        let next = next.unwrap();
        assert_ne!(next.unit.id, weak);
        assert_eq!(s.unit_status(weak), Some(UnitStatus::Untouched));
        assert_eq!(s.next_optimization().unwrap().unwrap().unit.id, weak);
    }

    #[tokio::test]
    async fn test_next_optimization_skips_pending_and_accepted() {
        let (mut s, summary, weak, strong) = session();
        s.generate_options(&RuleBasedGenerator, weak, &params())
            .await
            .unwrap();
        let next = s.next_optimization().unwrap().unwrap();
        assert_ne!(next.unit.id, weak);
        assert!([summary, strong].contains(&next.unit.id));
    }

    #[test]
    fn test_candidate_selector_deserializes_index_or_text() {
        let index: CandidateSelector = serde_json::from_str("2").unwrap();
        assert_eq!(index, CandidateSelector::Index(2));
        let text: CandidateSelector = serde_json::from_str(r#""Built the ledger""#).unwrap();
        assert_eq!(text, CandidateSelector::Text("Built the ledger".to_string()));
    }

    #[test]
    fn test_unit_status_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&UnitStatus::PendingOptions).unwrap(),
            r#""pending-options""#
        );
    }
}
