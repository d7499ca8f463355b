//! Case/combination manager
//!
//! Owns one [`ModelSnapshot`], the stiffness assembled from it and the
//! [`ResultsCache`]. Load cases are solved one at a time; combinations are
//! superposed from the cached case results without a new solve.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::analysis::diagram::MemberDiagram;
use crate::analysis::{
    assemble, build_case_loads, solver, AnalysisOptions, Assembly, CaseLoads, DofPartition, ReducedSystem,
    Solution,
};
use crate::error::{FrameError, FrameResult};
use crate::math::Vec6;
use crate::model::{ModelSnapshot, DOFS_PER_NODE};
use crate::results::{
    AnalysisResult, AnalysisStatus, NodeDisplacement, NodeResult, Reactions, ResultsCache,
};
use crate::units::{m_to_mm, n_to_kn};

/// Run state of a load case or combination
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CaseStatus {
    #[default]
    NotRun,
    Running,
    Solved,
    Failed(FrameError),
}

impl CaseStatus {
    pub fn is_solved(&self) -> bool {
        matches!(self, CaseStatus::Solved)
    }

    /// The recorded error of a failed run
    pub fn error(&self) -> Option<&FrameError> {
        match self {
            CaseStatus::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Cooperative stop flag for batch runs
///
/// Checked before each case or combination; a solve already underway
/// always completes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running batch to stop after the current case
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Stiffness and DOF partition of the current snapshot
#[derive(Debug, Clone)]
struct Prepared {
    assembly: Assembly,
    /// Support errors fail each case, not the batch
    dofs: FrameResult<DofPartition>,
}

impl Prepared {
    fn build(model: &ModelSnapshot, options: &AnalysisOptions) -> FrameResult<Self> {
        model.validate(options.geometry_tolerance)?;
        let assembly = assemble(model, options)?;
        let dofs = DofPartition::from_model(model);
        Ok(Self { assembly, dofs })
    }
}

/// Drives load case solves and combination superposition for one model
#[derive(Debug)]
pub struct AnalysisManager {
    model: ModelSnapshot,
    options: AnalysisOptions,
    prepared: Option<Prepared>,
    cache: ResultsCache,
    case_status: BTreeMap<String, CaseStatus>,
    combination_status: BTreeMap<String, CaseStatus>,
    cancel: CancelToken,
}

impl AnalysisManager {
    /// Create a manager with default options
    pub fn new(model: ModelSnapshot) -> Self {
        Self::with_options(model, AnalysisOptions::default())
    }

    pub fn with_options(model: ModelSnapshot, options: AnalysisOptions) -> Self {
        Self {
            model,
            options,
            prepared: None,
            cache: ResultsCache::default(),
            case_status: BTreeMap::new(),
            combination_status: BTreeMap::new(),
            cancel: CancelToken::new(),
        }
    }

    // ========================
    // Accessors
    // ========================

    pub fn model(&self) -> &ModelSnapshot {
        &self.model
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    pub fn cache(&self) -> &ResultsCache {
        &self.cache
    }

    /// Result of a case or combination, if solved
    pub fn result(&self, name: &str) -> Option<&AnalysisResult> {
        self.cache.get(name)
    }

    pub fn case_status(&self, name: &str) -> CaseStatus {
        self.case_status.get(name).cloned().unwrap_or_default()
    }

    pub fn combination_status(&self, name: &str) -> CaseStatus {
        self.combination_status.get(name).cloned().unwrap_or_default()
    }

    /// Error message of every failed case and combination
    pub fn failures(&self) -> BTreeMap<String, String> {
        self.case_status
            .iter()
            .chain(&self.combination_status)
            .filter_map(|(name, status)| status.error().map(|err| (name.clone(), err.to_string())))
            .collect()
    }

    /// Token that stops the current or next batch run
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// True when the snapshot validates, has elements and load cases, and
    /// its supports restrain all rigid-body motion
    pub fn is_ready(&self) -> bool {
        !self.model.elements().is_empty()
            && !self.model.load_cases().is_empty()
            && self.model.validate(self.options.geometry_tolerance).is_ok()
            && DofPartition::from_model(&self.model).is_ok()
    }

    // ========================
    // Model and option changes
    // ========================

    /// Swap in a new snapshot, keeping every result it cannot affect
    ///
    /// Any change to nodes, supports or elements drops all results. Otherwise
    /// only cases whose definition or loads changed are dropped, together with
    /// the combinations that use them or were themselves edited.
    pub fn replace_model(&mut self, model: ModelSnapshot) {
        if !self.model.same_structure(&model) {
            info!("structure changed, clearing all results");
            self.model = model;
            self.invalidate_all();
            return;
        }

        let changed_cases: Vec<String> = self
            .model
            .load_cases()
            .iter()
            .chain(model.load_cases())
            .map(|c| c.name.clone())
            .filter(|name| case_changed(&self.model, &model, name))
            .collect();

        let changed_combos: Vec<String> = self
            .model
            .load_combos()
            .iter()
            .chain(model.load_combos())
            .filter(|c| {
                self.model.load_combo(&c.name) != model.load_combo(&c.name)
                    || changed_cases.iter().any(|case| c.includes(case))
            })
            .map(|c| c.name.clone())
            .collect();

        for name in &changed_cases {
            self.cache.case_results.remove(name);
            self.case_status.remove(name);
        }
        for name in &changed_combos {
            self.cache.combination_results.remove(name);
            self.combination_status.remove(name);
        }

        debug!(
            "model replaced: {} cases and {} combinations invalidated",
            changed_cases.len(),
            changed_combos.len()
        );
        // Stiffness still holds, but edited loads must validate again
        if model.validate(self.options.geometry_tolerance).is_err() {
            self.prepared = None;
        }
        self.model = model;
    }

    /// Change the options, dropping all results
    pub fn set_options(&mut self, options: AnalysisOptions) {
        self.options = options;
        self.invalidate_all();
    }

    fn invalidate_all(&mut self) {
        self.prepared = None;
        self.cache.clear();
        self.case_status.clear();
        self.combination_status.clear();
    }

    // ========================
    // Analysis
    // ========================

    /// Validate the snapshot and assemble its stiffness
    ///
    /// Structural errors (degenerate elements, dangling references) are
    /// reported here, before any case runs.
    pub fn prepare(&mut self) -> FrameResult<()> {
        if self.prepared.is_none() {
            self.prepared = Some(Prepared::build(&self.model, &self.options)?);
        }
        Ok(())
    }

    /// Solve one load case and cache its result
    ///
    /// A failure is recorded as the case status and leaves other cases
    /// untouched.
    pub fn run_case(&mut self, name: &str) -> FrameResult<&AnalysisResult> {
        if self.model.load_case(name).is_none() {
            return Err(FrameError::LoadCaseNotFound(name.to_string()));
        }

        info!("running load case '{}'", name);
        self.case_status.insert(name.to_string(), CaseStatus::Running);

        let outcome = self.prepare().and_then(|()| {
            let prepared = self
                .prepared
                .as_ref()
                .ok_or_else(|| FrameError::AnalysisFailed("stiffness not assembled".to_string()))?;
            solve_case(&self.model, &self.options, prepared, name)
        });

        match outcome {
            Ok(result) => {
                self.case_status.insert(name.to_string(), CaseStatus::Solved);
                self.cache.case_results.insert(name.to_string(), result);
                info!("load case '{}' solved", name);
                Ok(&self.cache.case_results[name])
            }
            Err(err) => {
                warn!("load case '{}' failed: {}", name, err);
                self.cache.case_results.remove(name);
                self.case_status.insert(name.to_string(), CaseStatus::Failed(err.clone()));
                Err(err)
            }
        }
    }

    /// Superpose a combination from its case results
    ///
    /// Structural model errors are returned before anything is solved. Cases
    /// without a cached result are solved first; one that cannot be solved
    /// fails the combination with `MissingCaseResult`.
    pub fn run_combination(&mut self, name: &str) -> FrameResult<&AnalysisResult> {
        self.prepare()?;
        let combo = self
            .model
            .load_combo(name)
            .ok_or_else(|| FrameError::LoadCombinationNotFound(name.to_string()))?;
        let factors: Vec<(String, f64)> = combo.factors.iter().map(|(c, f)| (c.clone(), *f)).collect();

        info!("running load combination '{}'", name);
        self.combination_status.insert(name.to_string(), CaseStatus::Running);

        match self.superpose(name, &factors) {
            Ok(result) => {
                self.combination_status.insert(name.to_string(), CaseStatus::Solved);
                self.cache.combination_results.insert(name.to_string(), result);
                Ok(&self.cache.combination_results[name])
            }
            Err(err) => {
                warn!("load combination '{}' failed: {}", name, err);
                self.cache.combination_results.remove(name);
                self.combination_status
                    .insert(name.to_string(), CaseStatus::Failed(err.clone()));
                Err(err)
            }
        }
    }

    fn superpose(&mut self, name: &str, factors: &[(String, f64)]) -> FrameResult<AnalysisResult> {
        if factors.is_empty() {
            return Err(FrameError::InvalidInput(format!(
                "load combination '{}' has no load cases",
                name
            )));
        }

        let missing = |case: &str| FrameError::MissingCaseResult {
            combination: name.to_string(),
            case: case.to_string(),
        };

        for (case, _) in factors {
            if self.cache.case(case).is_some() {
                continue;
            }
            if self.model.load_case(case).is_none() {
                return Err(missing(case));
            }
            if self.run_case(case).is_err() {
                return Err(missing(case));
            }
        }

        let mut terms = Vec::with_capacity(factors.len());
        for (case, factor) in factors {
            let result = self.cache.case(case).ok_or_else(|| missing(case))?;
            terms.push((*factor, result));
        }
        Ok(AnalysisResult::superpose(terms))
    }

    /// Solve every load case
    ///
    /// Fails only on structural model errors; per-case failures are counted
    /// in the returned status.
    pub fn run_all_cases(&mut self) -> FrameResult<AnalysisStatus> {
        self.prepare()?;

        let names: Vec<String> = self.model.load_cases().iter().map(|c| c.name.clone()).collect();
        self.cache.status.total_cases = names.len();
        self.cache.status.successful_cases = 0;
        self.cache.status.cancelled = false;

        for name in &names {
            if self.take_cancel() {
                break;
            }
            if self.run_case(name).is_ok() {
                self.cache.status.successful_cases += 1;
            }
        }

        Ok(self.cache.status)
    }

    /// Superpose every load combination
    pub fn run_all_combinations(&mut self) -> FrameResult<AnalysisStatus> {
        self.prepare()?;

        let names: Vec<String> = self.model.load_combos().iter().map(|c| c.name.clone()).collect();
        self.cache.status.total_combinations = names.len();
        self.cache.status.successful_combinations = 0;
        self.cache.status.cancelled = false;

        for name in &names {
            if self.take_cancel() {
                break;
            }
            if self.run_combination(name).is_ok() {
                self.cache.status.successful_combinations += 1;
            }
        }

        // Combinations may have solved cases on demand
        self.cache.status.total_cases = self.model.load_cases().len();
        self.cache.status.successful_cases = self
            .model
            .load_cases()
            .iter()
            .filter(|c| self.case_status(&c.name).is_solved())
            .count();

        Ok(self.cache.status)
    }

    /// Solve every case, then every combination
    pub fn run_analysis(&mut self) -> FrameResult<AnalysisStatus> {
        info!(
            "analysis: {} nodes, {} elements, {} cases, {} combinations",
            self.model.nodes().len(),
            self.model.elements().len(),
            self.model.load_cases().len(),
            self.model.load_combos().len()
        );

        let status = self.run_all_cases()?;
        if status.cancelled {
            return Ok(status);
        }
        let status = self.run_all_combinations()?;

        info!(
            "analysis complete: {}/{} cases, {}/{} combinations",
            status.successful_cases, status.total_cases, status.successful_combinations, status.total_combinations
        );
        Ok(status)
    }

    fn take_cancel(&mut self) -> bool {
        if !self.cancel.is_cancelled() {
            return false;
        }
        info!("batch cancelled");
        self.cancel.reset();
        self.cache.status.cancelled = true;
        true
    }
}

/// A case changed when its definition or any of its loads differ
fn case_changed(old: &ModelSnapshot, new: &ModelSnapshot, case: &str) -> bool {
    old.load_case(case) != new.load_case(case)
        || !old.loads_for_case(case).eq(new.loads_for_case(case))
}

fn solve_case(
    model: &ModelSnapshot,
    options: &AnalysisOptions,
    prepared: &Prepared,
    case: &str,
) -> FrameResult<AnalysisResult> {
    let dofs = prepared.dofs.clone()?;
    let assembly = &prepared.assembly;

    let loads = build_case_loads(model, assembly, case)?;
    let reduced = ReducedSystem::partition(&assembly.k, &loads.f, &dofs);
    let solution = solver::solve(&reduced, &dofs, assembly.num_dofs(), options.pivot_tolerance)?;

    let mut result = post_process(model, assembly, &loads, &solution);
    if options.check_statics {
        let coords: Vec<[f64; 2]> = model.nodes().iter().map(|n| n.coords()).collect();
        result.statics_balanced = Some(solution.check_statics(case, &loads.f, &coords, options.statics_tolerance));
    }
    Ok(result)
}

fn post_process(model: &ModelSnapshot, assembly: &Assembly, loads: &CaseLoads, solution: &Solution) -> AnalysisResult {
    let mut result = AnalysisResult::default();

    for (idx, node) in model.nodes().iter().enumerate() {
        let base = idx * DOFS_PER_NODE;
        let u = &solution.displacements;
        let r = &solution.reactions;
        let node_result = NodeResult {
            displacement: NodeDisplacement::from_array([m_to_mm(u[base]), m_to_mm(u[base + 1]), u[base + 2]]),
            reactions: node
                .support
                .is_supported()
                .then(|| Reactions::from_array([n_to_kn(r[base]), n_to_kn(r[base + 1]), n_to_kn(r[base + 2])])),
        };
        result.nodes.insert(node.name.clone(), node_result);
    }

    for (e_idx, element) in model.elements().iter().enumerate() {
        let dofs = assembly.element_dofs[e_idx];
        let d_global = Vec6::from_fn(|r, _| solution.displacements[dofs[r]]);
        let diagram = MemberDiagram::new(
            &assembly.elements[e_idx],
            &d_global,
            &loads.fixed_end[e_idx],
            &loads.member_loads[e_idx],
            element.flexural_rigidity(),
        );
        result.elements.insert(element.name.clone(), diagram.to_result());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::{Element, Node, Support};
    use crate::loads::{LoadCase, LoadCombination, NodeLoad};
    use approx::assert_relative_eq;

    fn cantilever() -> ModelSnapshot {
        let mut model = ModelSnapshot::new();
        model.add_node(Node::new("A", 0.0, 0.0).with_support(Support::Fixed)).unwrap();
        model.add_node(Node::new("B", 3.0, 0.0)).unwrap();
        model.add_element(Element::new("M1", "A", "B", 200.0, 1e-4, 0.01)).unwrap();
        model.add_load_case(LoadCase::dead()).unwrap();
        model.add_load_case(LoadCase::live()).unwrap();
        model.add_node_load(NodeLoad::fy("B", -10.0, "Dead")).unwrap();
        model.add_node_load(NodeLoad::fy("B", -4.0, "Live")).unwrap();
        model.add_load_combo(LoadCombination::lrfd_dead_live()).unwrap();
        model
    }

    #[test]
    fn test_status_transitions() {
        let mut manager = AnalysisManager::new(cantilever());
        assert_eq!(manager.case_status("Dead"), CaseStatus::NotRun);
        manager.run_case("Dead").unwrap();
        assert!(manager.case_status("Dead").is_solved());
        assert_eq!(manager.case_status("Live"), CaseStatus::NotRun);
    }

    #[test]
    fn test_combination_solves_missing_cases() {
        let mut manager = AnalysisManager::new(cantilever());
        let combo = manager.run_combination("1.2D + 1.6L").unwrap().clone();
        assert!(manager.case_status("Dead").is_solved());
        assert!(manager.case_status("Live").is_solved());

        let tip = combo.node("B").unwrap().displacement.dy;
        let dead = manager.result("Dead").unwrap().node("B").unwrap().displacement.dy;
        let live = manager.result("Live").unwrap().node("B").unwrap().displacement.dy;
        assert_relative_eq!(tip, 1.2 * dead + 1.6 * live, max_relative = 1e-12);
    }

    #[test]
    fn test_unknown_names() {
        let mut manager = AnalysisManager::new(cantilever());
        assert!(matches!(manager.run_case("Snow"), Err(FrameError::LoadCaseNotFound(_))));
        assert!(matches!(
            manager.run_combination("Snow"),
            Err(FrameError::LoadCombinationNotFound(_))
        ));
    }

    #[test]
    fn test_cancel_before_batch() {
        let mut manager = AnalysisManager::new(cantilever());
        manager.cancel_token().cancel();
        let status = manager.run_analysis().unwrap();
        assert!(status.cancelled);
        assert_eq!(status.successful_cases, 0);
        assert!(!manager.cancel_token().is_cancelled());

        let status = manager.run_analysis().unwrap();
        assert!(!status.cancelled);
        assert_eq!(status.successful_cases, 2);
        assert_eq!(status.successful_combinations, 1);
    }

    #[test]
    fn test_combinations_count_cases_they_solve() {
        let mut manager = AnalysisManager::new(cantilever());
        let status = manager.run_all_combinations().unwrap();
        assert_eq!(status.successful_combinations, 1);
        assert_eq!(status.total_cases, 2);
        assert_eq!(status.successful_cases, 2);
        assert_eq!(manager.cache().status, status);
    }

    #[test]
    fn test_combination_reports_structural_errors() {
        let mut json = serde_json::to_value(cantilever()).unwrap();
        json["elements"][0]["a"] = serde_json::json!(0.0);
        let model: ModelSnapshot = serde_json::from_value(json).unwrap();

        let mut manager = AnalysisManager::new(model);
        assert!(matches!(
            manager.run_combination("1.2D + 1.6L"),
            Err(FrameError::DegenerateElement { .. })
        ));
        assert_eq!(manager.case_status("Dead"), CaseStatus::NotRun);
        assert_eq!(manager.combination_status("1.2D + 1.6L"), CaseStatus::NotRun);
    }

    #[test]
    fn test_ready_flag() {
        assert!(AnalysisManager::new(cantilever()).is_ready());
        assert!(!AnalysisManager::new(ModelSnapshot::new()).is_ready());
    }
}
