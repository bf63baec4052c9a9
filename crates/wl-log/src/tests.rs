//! Unit tests for wl-log.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tempfile::TempDir;

use wl_core::Point;
use wl_zones::Ground;

use crate::{
    log_path_for, parse_complete, read_day, read_recent, DailyLogWriter, LogError, LogLine,
    LogResult, LogWriter, PerceptionRecord, PerceptionRecorder, ScreenshotRecord,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

fn at(h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, h, m, 0).unwrap()
}

fn perception(t: DateTime<Utc>, district: &str) -> PerceptionRecord {
    PerceptionRecord {
        t,
        pos:      Point::new(1.5, -2.0),
        district: district.to_string(),
        activity: "exploring".to_string(),
        ground:   Ground::Road,
        mood:     "alert".to_string(),
        weather:  Some("rainy".to_string()),
    }
}

fn lines_of(path: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}

// ── Record format ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod record {
    use super::*;

    #[test]
    fn perception_round_trip() {
        let original = LogLine::Perception(perception(at(9, 30), "Downtown"));
        let line = original.to_line().unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);
        assert_eq!(LogLine::parse(line.trim_end()).unwrap(), original);
    }

    #[test]
    fn absent_weather_is_omitted() {
        let mut p = perception(at(9, 30), "Downtown");
        p.weather = None;
        let line = LogLine::from(p.clone()).to_line().unwrap();
        assert!(!line.contains("weather"));
        assert_eq!(LogLine::parse(line.trim_end()).unwrap(), LogLine::Perception(p));
    }

    #[test]
    fn screenshot_marker_carries_type() {
        let marker = LogLine::Screenshot(ScreenshotRecord { t: at(10, 0), file: "a.jpg".into() });
        let line = marker.to_line().unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["type"], "screenshot");
        assert_eq!(value["file"], "a.jpg");
        assert_eq!(LogLine::parse(line.trim_end()).unwrap(), marker);
    }

    #[test]
    fn parses_externally_written_lines() {
        let line = r#"{"t":"2024-03-01T12:00:00.000Z","pos":{"x":1.5,"z":-2},"district":"Downtown","activity":"exploring","ground":"road","weather":"rainy","mood":"alert"}"#;
        let parsed = LogLine::parse(line).unwrap();
        let p = parsed.as_perception().unwrap();
        assert_eq!(p.t, at(12, 0));
        assert_eq!(p.pos, Point::new(1.5, -2.0));
        assert_eq!(p.ground, Ground::Road);

        let null_type = r#"{"type":null,"t":"2024-03-01T12:00:00Z","pos":{"x":0,"z":0},"district":"D","activity":"a","ground":"terrain","mood":"m"}"#;
        assert!(LogLine::parse(null_type).unwrap().as_perception().is_some());
    }

    #[test]
    fn bad_discriminant_is_parse_error() {
        let line = r#"{"type":"video","t":"2024-03-01T12:00:00Z","file":"x"}"#;
        assert!(matches!(LogLine::parse(line), Err(LogError::Parse(_))));
        let line = r#"{"type":7,"t":"2024-03-01T12:00:00Z","file":"x"}"#;
        assert!(matches!(LogLine::parse(line), Err(LogError::Parse(_))));
        // Screenshot marker without a file.
        let line = r#"{"type":"screenshot","t":"2024-03-01T12:00:00Z"}"#;
        assert!(matches!(LogLine::parse(line), Err(LogError::Json(_))));
    }
}

// ── Daily writer ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod daily_writer {
    use super::*;

    #[test]
    fn creates_directory_lazily() {
        let dir = tmp();
        let logs = dir.path().join("a").join("b");
        let mut w = DailyLogWriter::new(&logs);
        assert!(!logs.exists());
        w.append(&perception(at(8, 0), "X").into()).unwrap();
        assert!(log_path_for(&logs, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()).exists());
        assert_eq!(w.active_path().unwrap().file_name().unwrap(), "2024-03-01.jsonl");
    }

    #[test]
    fn rotates_at_midnight() {
        let dir = tmp();
        let mut w = DailyLogWriter::new(dir.path());
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 23, 58, 0).unwrap();
        for i in 0..8 {
            let t = base + Duration::seconds(30 * i);
            w.append(&perception(t, &format!("d{i}")).into()).unwrap();
        }
        w.finish().unwrap();

        let day1 = read_day(&dir.path().join("2024-03-01.jsonl")).unwrap().unwrap();
        let day2 = read_day(&dir.path().join("2024-03-02.jsonl")).unwrap().unwrap();
        assert_eq!(day1.len(), 4);
        assert_eq!(day2.len(), 4);
        assert!(day1.windows(2).all(|w| w[0].t() <= w[1].t()));
        assert!(day2.windows(2).all(|w| w[0].t() <= w[1].t()));
        assert!(day1.iter().all(|l| l.t().date_naive() == NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));

        let names: Vec<String> = day1
            .iter()
            .chain(&day2)
            .map(|l| l.as_perception().unwrap().district.clone())
            .collect();
        assert_eq!(names, (0..8).map(|i| format!("d{i}")).collect::<Vec<_>>());
    }

    #[test]
    fn reopening_appends() {
        let dir = tmp();
        let mut w = DailyLogWriter::new(dir.path());
        w.append(&perception(at(1, 0), "A").into()).unwrap();
        w.finish().unwrap();
        let mut w = DailyLogWriter::new(dir.path());
        w.append(&perception(at(2, 0), "B").into()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        assert_eq!(lines_of(&dir.path().join("2024-03-01.jsonl")).len(), 2);
    }

    #[test]
    fn torn_tail_does_not_swallow_next_record() {
        let dir = tmp();
        let path = dir.path().join("2024-03-01.jsonl");
        let full = LogLine::from(perception(at(1, 0), "Torn")).to_line().unwrap();
        std::fs::write(&path, &full[..full.len() / 2]).unwrap();

        let mut w = DailyLogWriter::new(dir.path());
        w.append(&perception(at(2, 0), "A").into()).unwrap();
        w.append(&perception(at(3, 0), "B").into()).unwrap();
        w.finish().unwrap();

        let raw = lines_of(&path);
        assert_eq!(raw.len(), 3);
        assert_eq!(raw[0], full[..full.len() / 2]);
        let names: Vec<String> = read_day(&path)
            .unwrap()
            .unwrap()
            .iter()
            .map(|l| l.as_perception().unwrap().district.clone())
            .collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn unwritable_directory_errors() {
        let dir = tmp();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let mut w = DailyLogWriter::new(&blocker);
        assert!(matches!(w.append(&perception(at(1, 0), "A").into()), Err(LogError::Io(_))));
        assert!(w.active_path().is_none());
    }
}

// ── Reader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod reader {
    use super::*;

    #[test]
    fn partial_tail_is_not_consumed() {
        let a = LogLine::from(perception(at(1, 0), "A")).to_line().unwrap();
        let b = LogLine::from(perception(at(1, 1), "B")).to_line().unwrap();
        let partial = &b[..b.len() / 2];
        let buf = format!("{a}{partial}");

        let parsed = parse_complete(buf.as_bytes());
        assert_eq!(parsed.lines.len(), 1);
        assert_eq!(parsed.consumed, a.len());
        assert_eq!(parsed.malformed, 0);

        assert_eq!(parse_complete(partial.as_bytes()).consumed, 0);
    }

    #[test]
    fn malformed_lines_skipped() {
        let good = LogLine::from(perception(at(1, 0), "A")).to_line().unwrap();
        let buf = format!("{good}{{not json\n\n{good}");
        let parsed = parse_complete(buf.as_bytes());
        assert_eq!(parsed.lines.len(), 2);
        assert_eq!(parsed.malformed, 1);
        assert_eq!(parsed.consumed, buf.len());
    }

    #[test]
    fn missing_file_is_no_data() {
        let dir = tmp();
        let path = dir.path().join("2020-01-01.jsonl");
        assert!(read_day(&path).unwrap().is_none());
        assert!(read_recent(&path, 20).unwrap().is_empty());
    }

    #[test]
    fn recent_keeps_tail() {
        let dir = tmp();
        let mut w = DailyLogWriter::new(dir.path());
        for i in 0..30 {
            w.append(&perception(at(3, i), &format!("d{i}")).into()).unwrap();
        }
        w.append(&ScreenshotRecord { t: at(3, 30), file: "s.jpg".into() }.into()).unwrap();
        w.finish().unwrap();

        let path = dir.path().join("2024-03-01.jsonl");
        let recent = read_recent(&path, 5).unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].as_perception().unwrap().district, "d26");
        assert!(recent[4].as_screenshot().is_some());
        assert_eq!(read_recent(&path, 100).unwrap().len(), 31);
    }
}

// ── Recorder ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod recorder {
    use super::*;

    use wl_core::SimConfig;
    use wl_sim::{SimBuilder, SimObserver};

    /// Fails the first `fail_first` appends, then keeps lines in memory.
    struct FlakyWriter {
        fail_first: usize,
        calls:      usize,
        kept:       Vec<LogLine>,
        finished:   bool,
    }

    impl LogWriter for FlakyWriter {
        fn append(&mut self, line: &LogLine) -> LogResult<()> {
            self.calls += 1;
            if self.calls <= self.fail_first {
                return Err(std::io::Error::other("disk full").into());
            }
            self.kept.push(line.clone());
            Ok(())
        }

        fn finish(&mut self) -> LogResult<()> {
            self.finished = true;
            Ok(())
        }
    }

    fn config(ticks: u64) -> SimConfig {
        SimConfig {
            start: Utc.with_ymd_and_hms(2024, 3, 1, 23, 50, 0).unwrap(),
            tick_millis: 1_000,
            total_ticks: Some(ticks),
            sample_interval_secs: 30.0,
            ..SimConfig::default()
        }
    }

    #[test]
    fn sim_run_writes_one_line_per_sample() {
        let dir = tmp();
        let mut sim = SimBuilder::new(config(1_200)).build().unwrap();
        let mut rec = PerceptionRecorder::new(DailyLogWriter::new(dir.path())).with_echo(false);
        sim.run(&mut rec).unwrap();
        assert!(rec.take_error().is_none());
        assert_eq!(rec.written(), 40);

        // 23:50 + 20 min crosses midnight: 20 samples each side.
        let day1 = read_day(&dir.path().join("2024-03-01.jsonl")).unwrap().unwrap();
        let day2 = read_day(&dir.path().join("2024-03-02.jsonl")).unwrap().unwrap();
        assert_eq!(day1.len(), 20);
        assert_eq!(day2.len(), 20);

        for line in day1.iter().chain(&day2) {
            let p = line.as_perception().unwrap();
            assert_eq!(p.pos, p.pos.rounded());
            assert!(!p.activity.is_empty());
            assert_eq!(p.weather.as_deref(), Some("rainy"));
        }
    }

    #[test]
    fn write_failure_is_not_fatal() {
        let writer = FlakyWriter { fail_first: 2, calls: 0, kept: Vec::new(), finished: false };
        let mut rec = PerceptionRecorder::new(writer).with_echo(false).with_weather(None);
        let mut sim = SimBuilder::new(config(150)).build().unwrap();
        sim.run(&mut rec).unwrap();

        assert_eq!(rec.failures(), 2);
        assert_eq!(rec.written(), 3);
        assert!(matches!(rec.take_error(), Some(LogError::Io(_))));
        assert!(rec.take_error().is_none());

        let writer = rec.into_writer();
        assert!(writer.finished);
        assert_eq!(writer.kept.len(), 3);
        assert!(writer.kept[0].as_perception().unwrap().weather.is_none());
    }

    #[test]
    fn screenshots_interleave() {
        let dir = tmp();
        let mut rec = PerceptionRecorder::new(DailyLogWriter::new(dir.path())).with_echo(false);
        rec.record(perception(at(5, 0), "A"));
        rec.record_screenshot("2024-03-01T05-00-30-000Z.jpg", at(5, 0) + Duration::seconds(30));
        rec.record(perception(at(5, 1), "B"));
        rec.on_sim_end(wl_core::Tick(0));

        let lines = read_day(&dir.path().join("2024-03-01.jsonl")).unwrap().unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].as_screenshot().unwrap().file, "2024-03-01T05-00-30-000Z.jpg");
        assert_eq!(rec.written(), 3);
    }
}

// ── Resource monitor ──────────────────────────────────────────────────────────

#[cfg(test)]
mod resources {
    use super::*;

    use wl_core::{SimConfig, Tick};
    use wl_sim::SimObserver;

    use crate::{ResourceMonitor, RESOURCE_HISTORY};

    fn fake_sampler() -> Option<(usize, usize)> {
        Some((64 * 1024 * 1024, 512 * 1024 * 1024))
    }

    fn no_sampler() -> Option<(usize, usize)> {
        None
    }

    fn config() -> SimConfig {
        SimConfig { start: at(0, 0), tick_millis: 1_000, ..SimConfig::default() }
    }

    #[test]
    fn history_is_bounded() {
        let dir = tmp();
        let path = dir.path().join("resources.jsonl");
        let mut mon = ResourceMonitor::new(&path, &config(), 1.0).with_sampler(fake_sampler);
        for t in 0..150 {
            mon.on_tick_end(Tick(t), false);
        }
        assert_eq!(mon.history().count(), RESOURCE_HISTORY);
        assert_eq!(mon.history().next().unwrap().tick, 50);
        let latest = mon.latest().unwrap();
        assert_eq!(latest.tick, 149);
        assert_eq!(latest.physical_mb, 64);
        assert_eq!(latest.virtual_mb, 512);
        assert_eq!(latest.timestamp, at(0, 0) + Duration::seconds(149));
        assert_eq!(lines_of(&path).len(), 150);
    }

    #[test]
    fn samples_on_interval() {
        let dir = tmp();
        let path = dir.path().join("nested").join("resources.jsonl");
        let mut mon = ResourceMonitor::new(&path, &config(), 300.0).with_sampler(fake_sampler);
        for t in 0..601 {
            mon.on_tick_end(Tick(t), true);
        }
        let ticks: Vec<u64> = mon.history().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![0, 300, 600]);
    }

    #[test]
    fn unavailable_stats_are_skipped() {
        let dir = tmp();
        let path = dir.path().join("resources.jsonl");
        let mut mon = ResourceMonitor::new(&path, &config(), 1.0).with_sampler(no_sampler);
        mon.on_tick_end(Tick(0), false);
        assert!(mon.latest().is_none());
        assert!(!path.exists());
        assert!(mon.take_error().is_none());
    }
}
