use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::warn;

use crate::{
    error::Error,
    model::JointStateModel,
    msg::{FeedbackReport, JointStateReport},
};

/// Publishes the current joint state on a fixed cadence.
///
/// Every tick reads one consistent snapshot of the model and emits a
/// [`JointStateReport`] and a [`FeedbackReport`] carrying the same sequence
/// number and timestamp, then advances the sequence counter. A failed
/// publish is logged and the next tick proceeds regardless; the missed
/// report is not retried.
#[derive(Debug)]
pub struct StateReporter {
    model: Arc<JointStateModel>,
    period: Duration,
    joint_state_tx: flume::Sender<JointStateReport>,
    feedback_tx: flume::Sender<FeedbackReport>,
    report_task: Option<JoinHandle<()>>,
}

impl StateReporter {
    /// Creates a reporter. The period is fixed for the process lifetime; a
    /// zero period is a configuration error.
    pub fn try_new(
        model: Arc<JointStateModel>,
        period: Duration,
        joint_state_tx: flume::Sender<JointStateReport>,
        feedback_tx: flume::Sender<FeedbackReport>,
    ) -> Result<Self, Error> {
        if period.is_zero() {
            return Err(Error::InvalidPeriod(period));
        }
        Ok(Self {
            model,
            period,
            joint_state_tx,
            feedback_tx,
            report_task: None,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawns the long-lived reporting task. Must be called exactly once,
    /// inside a tokio runtime.
    pub fn run_report_task(&mut self) {
        if self.report_task.is_some() {
            panic!("report task is already running.");
        }
        let model = self.model.clone();
        let period = self.period;
        let joint_state_tx = self.joint_state_tx.clone();
        let feedback_tx = self.feedback_tx.clone();
        self.report_task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let snapshot = model.snapshot();
                let stamp = SystemTime::now();
                let joint_state = JointStateReport {
                    sequence: snapshot.sequence,
                    stamp,
                    names: snapshot.names.clone(),
                    positions: snapshot.positions.clone(),
                };
                if let Err(e) = publish(&joint_state_tx, joint_state) {
                    warn!("failed to publish joint state: {e}");
                }
                let feedback = FeedbackReport {
                    sequence: snapshot.sequence,
                    stamp,
                    joint_names: snapshot.names,
                    actual: snapshot.positions,
                };
                if let Err(e) = publish(&feedback_tx, feedback) {
                    warn!("failed to publish feedback: {e}");
                }
                model.advance_sequence();
            }
        }));
    }
}

fn publish<T>(tx: &flume::Sender<T>, report: T) -> Result<(), Error> {
    tx.send(report).map_err(|e| Error::Connection {
        message: e.to_string(),
    })
}

impl Drop for StateReporter {
    fn drop(&mut self) {
        if let Some(task) = self.report_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use assert_approx_eq::assert_approx_eq;

    use super::*;

    fn running_reporter(
        model: &Arc<JointStateModel>,
        period: Duration,
    ) -> (
        StateReporter,
        flume::Receiver<JointStateReport>,
        flume::Receiver<FeedbackReport>,
    ) {
        let (joint_state_tx, joint_state_rx) = flume::unbounded();
        let (feedback_tx, feedback_rx) = flume::unbounded();
        let mut reporter =
            StateReporter::try_new(model.clone(), period, joint_state_tx, feedback_tx).unwrap();
        reporter.run_report_task();
        (reporter, joint_state_rx, feedback_rx)
    }

    #[test]
    fn zero_period_is_rejected() {
        let model = Arc::new(JointStateModel::new(vec!["j1".to_owned()]));
        let (joint_state_tx, _joint_state_rx) = flume::unbounded();
        let (feedback_tx, _feedback_rx) = flume::unbounded();
        let err = StateReporter::try_new(model, Duration::ZERO, joint_state_tx, feedback_tx)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPeriod(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn sequence_is_gapless_and_pairs_match() {
        let model = Arc::new(JointStateModel::new(vec!["j1".to_owned(), "j2".to_owned()]));
        let (_reporter, joint_state_rx, feedback_rx) =
            running_reporter(&model, Duration::from_millis(100));
        for expected in 0..5u64 {
            let joint_state = joint_state_rx.recv_async().await.unwrap();
            let feedback = feedback_rx.recv_async().await.unwrap();
            assert_eq!(joint_state.sequence, expected);
            assert_eq!(feedback.sequence, expected);
            assert_eq!(joint_state.stamp, feedback.stamp);
            assert_eq!(joint_state.names, feedback.joint_names);
            assert_eq!(joint_state.positions, feedback.actual);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn reports_reflect_model_updates() {
        let model = Arc::new(JointStateModel::new(vec!["j1".to_owned(), "j2".to_owned()]));
        let (_reporter, joint_state_rx, _feedback_rx) =
            running_reporter(&model, Duration::from_millis(100));
        let first = joint_state_rx.recv_async().await.unwrap();
        assert_approx_eq!(first.positions[0], 0.0);
        let targets: HashMap<String, f64> =
            [("j1".to_owned(), 1.0), ("j2".to_owned(), -2.0)].into();
        model.apply_targets(&targets).unwrap();
        // Drain until the update shows up; it must arrive within one tick.
        let report = loop {
            let report = joint_state_rx.recv_async().await.unwrap();
            if report.positions[0] != 0.0 {
                break report;
            }
        };
        assert_approx_eq!(report.positions[0], 1.0);
        assert_approx_eq!(report.positions[1], -2.0);
    }

    #[test]
    fn disconnected_publish_is_a_connection_error() {
        let (tx, rx) = flume::unbounded::<JointStateReport>();
        drop(rx);
        let err = publish(
            &tx,
            JointStateReport {
                sequence: 0,
                stamp: SystemTime::now(),
                names: Vec::new(),
                positions: Vec::new(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, Error::Connection { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn reporting_survives_a_dropped_consumer() {
        let model = Arc::new(JointStateModel::new(vec!["j1".to_owned()]));
        let (_reporter, joint_state_rx, feedback_rx) =
            running_reporter(&model, Duration::from_millis(100));
        drop(feedback_rx);
        let mut last = None;
        for _ in 0..3 {
            let report = joint_state_rx.recv_async().await.unwrap();
            if let Some(last) = last {
                assert_eq!(report.sequence, last + 1);
            }
            last = Some(report.sequence);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn zero_joint_model_reports_empty_arrays() {
        let model = Arc::new(JointStateModel::new(Vec::new()));
        let (_reporter, joint_state_rx, feedback_rx) =
            running_reporter(&model, Duration::from_millis(100));
        let joint_state = joint_state_rx.recv_async().await.unwrap();
        assert!(joint_state.names.is_empty());
        assert!(joint_state.positions.is_empty());
        let feedback = feedback_rx.recv_async().await.unwrap();
        assert!(feedback.joint_names.is_empty());
        assert!(feedback.actual.is_empty());
    }
}
