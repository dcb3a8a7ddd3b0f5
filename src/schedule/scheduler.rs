use chrono::{Local, NaiveDateTime};
use std::time::Duration;
use tracing::{info, warn};

use super::trigger::Trigger;
use crate::config::ScheduleEntry;
use crate::reminder::{ReminderJob, ReminderService};

#[derive(Debug, Clone)]
struct ScheduledJob {
    job: ReminderJob,
    trigger: Trigger,
    next_run: NaiveDateTime,
}

/// Weekly reminder jobs and when each runs next
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    jobs: Vec<ScheduledJob>,
}

impl Scheduler {
    /// Build from config entries; first runs are the next occurrence after `now`
    pub fn from_entries(entries: &[ScheduleEntry], now: NaiveDateTime) -> Result<Self, Vec<String>> {
        let mut jobs = Vec::new();
        let mut errors = Vec::new();

        for (i, entry) in entries.iter().enumerate() {
            match Trigger::parse(&entry.day, &entry.at) {
                Ok(trigger) => jobs.push(ScheduledJob {
                    job: ReminderJob {
                        kind: entry.reminder,
                        message_no_prs: entry.message_no_prs,
                    },
                    trigger,
                    next_run: trigger.next_after(now),
                }),
                Err(e) => errors.push(format!("schedule[{}]: {}", i, e)),
            }
        }

        if errors.is_empty() {
            Ok(Self { jobs })
        } else {
            Err(errors)
        }
    }

    /// Jobs due at `now`, in configuration order. Each returned job is moved
    /// to its next weekly slot, so missed runs collapse into one.
    pub fn due(&mut self, now: NaiveDateTime) -> Vec<ReminderJob> {
        let mut due = Vec::new();
        for scheduled in &mut self.jobs {
            if scheduled.next_run <= now {
                due.push(scheduled.job);
                scheduled.next_run = scheduled.trigger.next_after(now);
            }
        }
        due
    }

    /// Earliest upcoming run
    pub fn next_run(&self) -> Option<NaiveDateTime> {
        self.jobs.iter().map(|j| j.next_run).min()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn describe(&self) -> Vec<String> {
        self.jobs
            .iter()
            .map(|j| format!("{:?} reminder {}", j.job.kind, j.trigger))
            .collect()
    }
}

/// Tick forever, running due jobs one after another on local wall-clock time.
/// A failing job is logged and the loop carries on.
pub async fn run_scheduler(mut scheduler: Scheduler, service: ReminderService, poll_interval: Duration) {
    for line in scheduler.describe() {
        info!("scheduled {}", line);
    }

    let mut ticker = tokio::time::interval(poll_interval);
    loop {
        ticker.tick().await;
        let now = Local::now().naive_local();
        for job in scheduler.due(now) {
            if let Err(e) = service.run_job(job).await {
                warn!(?job, error = %e, "scheduled reminder failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_schedule, ReminderKind};
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        // November 2024: the 18th is a Monday, the 20th a Wednesday
        NaiveDate::from_ymd_opt(2024, 11, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_default_schedule() {
        let mut scheduler = Scheduler::from_entries(&default_schedule(), at(17, 12, 0)).unwrap();
        assert_eq!(scheduler.len(), 3);
        assert_eq!(scheduler.next_run(), Some(at(18, 9, 0)));

        assert!(scheduler.due(at(18, 8, 59)).is_empty());

        let monday = scheduler.due(at(18, 9, 0));
        assert_eq!(
            monday.iter().map(|j| j.kind).collect::<Vec<_>>(),
            vec![ReminderKind::Global, ReminderKind::Personal]
        );
        // already ran this slot
        assert!(scheduler.due(at(18, 9, 0)).is_empty());
        assert_eq!(scheduler.next_run(), Some(at(20, 9, 0)));

        let wednesday = scheduler.due(at(20, 9, 0));
        assert_eq!(wednesday.len(), 1);
        assert_eq!(wednesday[0].kind, ReminderKind::Global);
    }

    #[test]
    fn test_missed_runs_collapse() {
        let mut scheduler = Scheduler::from_entries(&default_schedule()[..1], at(17, 12, 0)).unwrap();
        // three weeks asleep: still one run, then rescheduled after now
        let late = NaiveDate::from_ymd_opt(2024, 12, 9).unwrap().and_hms_opt(10, 0, 0).unwrap();
        assert_eq!(scheduler.due(late).len(), 1);
        assert!(scheduler.due(late).is_empty());
        assert!(scheduler.next_run().unwrap() > late);
    }

    #[test]
    fn test_personal_flag_carried() {
        let entries = vec![ScheduleEntry {
            reminder: ReminderKind::Personal,
            day: "friday".to_string(),
            at: "16:30".to_string(),
            message_no_prs: true,
        }];
        let mut scheduler = Scheduler::from_entries(&entries, at(18, 0, 0)).unwrap();
        let jobs = scheduler.due(at(22, 16, 30));
        assert_eq!(
            jobs,
            vec![ReminderJob {
                kind: ReminderKind::Personal,
                message_no_prs: true
            }]
        );
    }

    #[test]
    fn test_bad_entries_reported() {
        let entries = vec![ScheduleEntry {
            reminder: ReminderKind::Global,
            day: "funday".to_string(),
            at: "09:00".to_string(),
            message_no_prs: false,
        }];
        let errors = Scheduler::from_entries(&entries, at(18, 0, 0)).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("schedule[0]"));
    }
}
