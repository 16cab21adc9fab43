use crate::infra::{InMemoryEvaluationRepository, InMemoryProgramRepository};
use clap::Args;
use grant_eval::config::SelectionConfig;
use grant_eval::error::AppError;
use grant_eval::workflows::grants::{
    check_eligibility, marking_breakdown, rank_applications, total_weight, validate_criteria,
    AnswerValue, ComparisonOperator, CriterionDraft, CriterionValues, DateParts,
    EligibilityRule, Evaluation, EvaluationCsvImporter, EvaluationIndex, EvaluationScale,
    GrantSelectionService, NewGrantProgram, QuestionId, RankedApplication, SelectionCriterion,
};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluation scale for the sample program (HUNDRED, TEN, FIVE, A2E).
    #[arg(long)]
    pub(crate) scale: Option<EvaluationScale>,
    /// Skip the eligibility portion of the demo.
    #[arg(long)]
    pub(crate) skip_eligibility: bool,
}

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// JSON file holding the program's selection criteria
    #[arg(long)]
    pub(crate) criteria: PathBuf,
    /// CSV export with columns Application ID, Question ID, Question Group ID, Value
    #[arg(long)]
    pub(crate) evaluations: PathBuf,
    /// Print the per-criterion breakdown under each application
    #[arg(long)]
    pub(crate) breakdown: bool,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        criteria,
        evaluations,
        breakdown,
    } = args;

    let raw = std::fs::read_to_string(&criteria)?;
    let criteria: Vec<SelectionCriterion> = serde_json::from_str(&raw)?;
    if let Err(err) = validate_criteria(&criteria) {
        println!("Warning: {err}; scores use the weights as given");
    }

    let scale = criteria
        .first()
        .map(|criterion| criterion.evaluation_scale)
        .unwrap_or_default();
    let evaluations = EvaluationCsvImporter::new(scale).from_path(evaluations)?;
    let index = EvaluationIndex::from_evaluations(evaluations);

    println!(
        "Ranking {} applications across {} criteria (scale {}, total weight {})",
        index.application_ids().count(),
        criteria.len(),
        scale,
        total_weight(&criteria)
    );
    let ranking = rank_applications(&criteria, &index);
    render_ranking(&ranking);

    if breakdown {
        for entry in &ranking {
            let detail = marking_breakdown(&entry.application_id, &criteria, &index);
            println!("\n{} ({:.2})", detail.application_id, detail.total_score);
            for component in &detail.components {
                println!(
                    "  - {} [{}]: avg {:.2} over {} evaluator(s) x {}% = {:.2}",
                    component.criterion_name,
                    component.question_key,
                    component.average_score,
                    component.evaluator_count,
                    component.weight,
                    component.weighted_score
                );
            }
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        scale,
        skip_eligibility,
    } = args;

    println!("Grant selection demo");

    if !skip_eligibility {
        render_eligibility_demo();
    }

    let config = SelectionConfig {
        default_scale: scale.unwrap_or_default(),
    };
    let service = GrantSelectionService::new(
        Arc::new(InMemoryProgramRepository::default()),
        Arc::new(InMemoryEvaluationRepository::default()),
        config,
    );

    println!("\nSelection criteria");
    let program = match service.create_program(NewGrantProgram {
        title: "Community Energy Fund".to_string(),
    }) {
        Ok(program) => program,
        Err(err) => {
            println!("  Program could not be drafted: {}", err);
            return Ok(());
        }
    };

    let drafts = [
        CriterionDraft::for_question("Carbon impact", "q-carbon"),
        CriterionDraft::for_question("Community benefit", "q-community"),
        CriterionDraft::for_question("Value for money", "q-value"),
    ];
    for draft in drafts {
        let name = draft.criterion_name.clone();
        match service.add_criterion(&program.id, draft) {
            Ok(updated) => {
                let weights: Vec<String> = updated
                    .criteria
                    .iter()
                    .map(|criterion| criterion.weight.to_string())
                    .collect();
                println!("- Added '{}' -> weights [{}]", name, weights.join(", "));
            }
            Err(err) => {
                println!("  Criterion rejected: {}", err);
                return Ok(());
            }
        }
    }

    let program = match service.publish(&program.id) {
        Ok(program) => program,
        Err(err) => {
            println!("  Publish rejected: {}", err);
            return Ok(());
        }
    };
    println!(
        "- Program {} is {} with {} criteria",
        program.id,
        program.status.label(),
        program.criteria.len()
    );

    let (_, max) = config.default_scale.score_range();
    let samples = [
        ("app-riverside", "q-carbon", 0.9),
        ("app-riverside", "q-carbon", 0.7),
        ("app-riverside", "q-community", 0.6),
        ("app-riverside", "q-value", 0.8),
        ("app-hillcrest", "q-carbon", 1.0),
        ("app-hillcrest", "q-community", 0.9),
        ("app-meadow", "q-value", 0.5),
    ];
    for (application, question, fraction) in samples {
        let value = (max * fraction).round();
        if let Err(err) = service.record_evaluation(
            &program.id,
            Evaluation::for_question(application, question, value),
        ) {
            println!("  Evaluation rejected: {}", err);
            return Ok(());
        }
    }

    println!("\nMarking scores (scale {})", config.default_scale);
    let ranking = match service.ranking(&program.id) {
        Ok(ranking) => ranking,
        Err(err) => {
            println!("  Ranking unavailable: {}", err);
            return Ok(());
        }
    };
    render_ranking(&ranking);

    if let Some(leader) = ranking.first() {
        match service.marking_score(&program.id, &leader.application_id) {
            Ok(breakdown) => match serde_json::to_string_pretty(&breakdown) {
                Ok(json) => println!("  Leader breakdown:\n{}", json),
                Err(err) => println!("  Leader breakdown unavailable: {}", err),
            },
            Err(err) => println!("  Leader breakdown unavailable: {}", err),
        }
    }

    Ok(())
}

fn render_eligibility_demo() {
    println!("\nEligibility check");
    let rules = vec![
        EligibilityRule {
            question_id: QuestionId::new("q-region"),
            operator: ComparisonOperator::InList,
            values: CriterionValues::scalars(["north east", "north west"]),
        },
        EligibilityRule {
            question_id: QuestionId::new("q-members"),
            operator: ComparisonOperator::GreaterThanOrEqual,
            values: CriterionValues::scalars([25_i64]),
        },
        EligibilityRule {
            question_id: QuestionId::new("q-incorporated"),
            operator: ComparisonOperator::LessThan,
            values: CriterionValues::dates([DateParts::new("1", "1", "2024")]),
        },
    ];

    let mut answers = BTreeMap::new();
    answers.insert(QuestionId::new("q-region"), AnswerValue::text("North East"));
    answers.insert(QuestionId::new("q-members"), AnswerValue::number(18.0));
    answers.insert(
        QuestionId::new("q-incorporated"),
        AnswerValue::Date(DateParts::new("12", "5", "2019")),
    );

    let report = check_eligibility(&rules, &answers);
    for verdict in &report.verdicts {
        println!(
            "- {} {} -> {}",
            verdict.question_id,
            verdict.operator,
            if verdict.passed { "pass" } else { "fail" }
        );
    }
    println!(
        "  Applicant is {}",
        if report.eligible {
            "eligible"
        } else {
            "not eligible"
        }
    );
}

fn render_ranking(ranking: &[RankedApplication]) {
    if ranking.is_empty() {
        println!("  No evaluated applications");
        return;
    }

    for entry in ranking {
        println!(
            "  {:>3}. {:<20} {:>8.2}  ({} criteria scored)",
            entry.rank,
            entry.application_id.as_str(),
            entry.total_score,
            entry.evaluated_criteria
        );
    }
}
