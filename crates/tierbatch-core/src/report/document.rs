//! Serializable report shapes.

use serde::Serialize;
use serde_json::value::RawValue;

use crate::model::Tier;
use crate::resizing::ResizingOutcome;
use crate::scheduler::{CommittedBatch, ScheduleOutcome};

/// One tier batch: `{ "size": 128, "images": [...] }`.
#[derive(Debug, Serialize)]
pub struct BatchRecord {
    pub size: u32,
    pub images: Vec<ImageRecord>,
}

#[derive(Debug, Serialize)]
pub struct ImageRecord {
    pub id: String,
    pub crucial: u8,
}

/// Element of a schedule array: a batch, or the trailing deadline marker.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ScheduleEntry {
    Batch(BatchRecord),
    Deadline { deadline: Box<RawValue> },
}

#[derive(Debug, Serialize)]
pub struct MissedRecord {
    pub id: String,
    /// 1-based tier index.
    pub size: usize,
    pub deadline: Box<RawValue>,
    pub crucial: u8,
}

#[derive(Debug, Serialize)]
pub struct MissedReport {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub missed_tasks: usize,
    pub missed_crucial: usize,
    pub missed_non_crucial: usize,
    pub deadline: Box<RawValue>,
    pub accumulated_time: Box<RawValue>,
    pub missed_task_details: Vec<MissedRecord>,
}

/// Resizing output: the batch list, or `[-1]` when infeasible.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ResizingDocument {
    Schedule(Vec<ScheduleEntry>),
    Infeasible([i32; 1]),
}

/// Format a number with six decimals as a raw JSON number.
fn fixed6(value: f64) -> serde_json::Result<Box<RawValue>> {
    RawValue::from_string(format!("{:.6}", value))
}

fn flag(crucial: bool) -> u8 {
    u8::from(crucial)
}

fn batch_record(batch: &CommittedBatch) -> BatchRecord {
    BatchRecord {
        size: batch.tier.resolution(),
        images: batch
            .jobs
            .iter()
            .map(|j| ImageRecord {
                id: j.id.clone(),
                crucial: flag(j.crucial),
            })
            .collect(),
    }
}

/// Committed batches in commit order, followed by the deadline marker.
pub fn schedule_document(outcome: &ScheduleOutcome) -> serde_json::Result<Vec<ScheduleEntry>> {
    let mut entries: Vec<ScheduleEntry> = outcome
        .batches()
        .map(|b| ScheduleEntry::Batch(batch_record(b)))
        .collect();
    entries.push(ScheduleEntry::Deadline {
        deadline: fixed6(outcome.global_deadline)?,
    });
    Ok(entries)
}

/// Missed-jobs summary; `None` when every job was scheduled.
pub fn missed_report(outcome: &ScheduleOutcome) -> serde_json::Result<Option<MissedReport>> {
    if outcome.missed.is_empty() {
        return Ok(None);
    }
    let missed_task_details = outcome
        .missed
        .iter()
        .map(|m| {
            Ok(MissedRecord {
                id: m.id.clone(),
                size: m.native_tier.index() + 1,
                deadline: fixed6(m.deadline)?,
                crucial: flag(m.crucial),
            })
        })
        .collect::<serde_json::Result<Vec<_>>>()?;

    Ok(Some(MissedReport {
        total_tasks: outcome.total_jobs,
        completed_tasks: outcome.scheduled_count(),
        missed_tasks: outcome.missed_count(),
        missed_crucial: outcome.missed_crucial(),
        missed_non_crucial: outcome.missed_non_crucial(),
        deadline: fixed6(outcome.global_deadline)?,
        accumulated_time: fixed6(outcome.accumulated_time)?,
        missed_task_details,
    }))
}

/// Batches by ascending tier plus the budget marker, or the sentinel.
pub fn resizing_document(outcome: &ResizingOutcome) -> serde_json::Result<ResizingDocument> {
    let plan = match outcome {
        ResizingOutcome::Assigned(plan) => plan,
        ResizingOutcome::Infeasible { .. } => return Ok(ResizingDocument::Infeasible([-1])),
    };
    let mut entries: Vec<ScheduleEntry> = Tier::ALL
        .into_iter()
        .filter_map(|tier| {
            let images: Vec<ImageRecord> = plan
                .jobs_at(tier)
                .map(|a| ImageRecord {
                    id: a.id.clone(),
                    crucial: flag(a.crucial),
                })
                .collect();
            (!images.is_empty()).then(|| {
                ScheduleEntry::Batch(BatchRecord {
                    size: tier.resolution(),
                    images,
                })
            })
        })
        .collect();
    entries.push(ScheduleEntry::Deadline {
        deadline: fixed6(plan.budget)?,
    });
    Ok(ResizingDocument::Schedule(entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Job};
    use crate::model::CostModel;
    use crate::resizing::ResizingOptimizer;
    use crate::scheduler::CompressionScheduler;
    use serde_json::{json, Value};

    fn tier(i: usize) -> Tier {
        Tier::new(i).unwrap()
    }

    fn outcome(deadline: f64) -> ScheduleOutcome {
        let model = CostModel::default();
        let mut c = Catalog::new(vec![
            Job::new("a", tier(1), deadline, true),
            Job::new("b", tier(3), deadline, true),
            Job::new("c", tier(0), deadline, false),
        ])
        .unwrap();
        CompressionScheduler::new(&model).run(&mut c)
    }

    #[test]
    fn schedule_document_shape() {
        let doc = schedule_document(&outcome(20.0)).unwrap();
        let text = serde_json::to_string(&doc).unwrap();
        assert!(text.ends_with(r#"{"deadline":20.000000}]"#));

        let value: Value = serde_json::from_str(&text).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 4);
        // One crucial job per crucial batch; ties keep ascending tier order.
        assert_eq!(items[0], json!({"size": 128, "images": [{"id": "a", "crucial": 1}]}));
        assert_eq!(items[1], json!({"size": 512, "images": [{"id": "b", "crucial": 1}]}));
        assert_eq!(items[2], json!({"size": 64, "images": [{"id": "c", "crucial": 0}]}));
    }

    #[test]
    fn missed_report_only_when_jobs_missed() {
        assert!(missed_report(&outcome(20.0)).unwrap().is_none());

        let report = missed_report(&outcome(8.0)).unwrap().unwrap();
        assert_eq!(report.total_tasks, 3);
        assert_eq!(report.missed_tasks, report.missed_crucial + report.missed_non_crucial);
        assert_eq!(report.completed_tasks + report.missed_tasks, 3);

        let text = serde_json::to_string(&report).unwrap();
        assert!(text.contains(r#""deadline":8.000000"#));
        assert!(text.contains(r#""id":"b","size":4,"deadline":8.000000,"crucial":1"#));
    }

    #[test]
    fn resizing_document_groups_by_tier() {
        let model = CostModel::default();
        let mut c = Catalog::new(vec![
            Job::new("x", tier(3), 12.0, true),
            Job::new("y", tier(1), 12.0, false),
        ])
        .unwrap();
        let outcome = ResizingOptimizer::new(&model).optimize(&mut c, 12.0);
        let text = serde_json::to_string(&resizing_document(&outcome).unwrap()).unwrap();
        assert_eq!(
            text,
            r#"[{"size":128,"images":[{"id":"y","crucial":0}]},{"size":256,"images":[{"id":"x","crucial":1}]},{"deadline":12.000000}]"#
        );
    }

    #[test]
    fn resizing_document_sentinel() {
        let model = CostModel::default();
        let mut c = Catalog::new(vec![Job::new("x", tier(3), 1.0, true)]).unwrap();
        let outcome = ResizingOptimizer::new(&model).optimize(&mut c, 1.0);
        let text = serde_json::to_string(&resizing_document(&outcome).unwrap()).unwrap();
        assert_eq!(text, "[-1]");
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert!(fixed6(f64::INFINITY).is_err());
        assert_eq!(fixed6(10.1).unwrap().get(), "10.100000");
    }
}
