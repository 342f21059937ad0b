//! Cross-crate wiring: config drives a worker, a scan fills a pool.

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use keel::{Config, ConfigError, Configurable, I18nPool, I18nRepository, Looper};

#[derive(Default)]
struct Poller {
    period: Duration,
    source: String,
}

impl Configurable for Poller {
    fn configure(&mut self, config: &Config) -> Result<(), ConfigError> {
        self.period = config
            .attribute_as::<Duration>("period")
            .map_err(|e| ConfigError::Syntax { line: 0, message: e.to_string() })?
            .unwrap_or(Duration::from_secs(1));
        self.source = config
            .attribute("source")
            .unwrap_or("default")
            .to_owned();
        Ok(())
    }
}

#[test]
fn config_configures_and_drives_a_worker() {
    let root = keel::config::load_xml_str(
        r#"<app>
             <poller period="15ms" source="queue"/>
           </app>"#,
    )
    .unwrap();

    let mut poller = Poller::default();
    poller.configure(root.find("poller").unwrap()).unwrap();
    assert_eq!(poller.period, Duration::from_millis(15));
    assert_eq!(poller.source, "queue");

    let polls = Arc::new(AtomicUsize::new(0));
    let seen = polls.clone();
    let mut looper = Looper::periodic(poller.period, move || {
        seen.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
    .unwrap()
    .name("poller");
    looper.start().unwrap();

    let deadline = Instant::now() + Duration::from_secs(5);
    while polls.load(Ordering::SeqCst) < 3 && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    looper.stop();
    assert!(polls.load(Ordering::SeqCst) >= 3);
}

#[test]
fn repository_scan_fills_pool_with_file_contents() {
    let dir = tempfile::tempdir().unwrap();
    for (tag, text) in [("en", "Hello"), ("ro", "Salut")] {
        fs::create_dir_all(dir.path().join(tag)).unwrap();
        fs::write(dir.path().join(tag).join("greeting.txt"), text).unwrap();
    }

    let repo = I18nRepository::multi(dir.path());
    let mut pool: I18nPool<String> = I18nPool::multi();
    for file in repo.scan().unwrap() {
        let text = fs::read_to_string(file.path()).unwrap();
        pool.put(file.locale(), file.relative_name(), text).unwrap();
    }

    let ro = keel::Locale::parse("ro").unwrap();
    assert_eq!(
        pool.get_localized(&ro, "greeting.txt").map(String::as_str),
        Some("Salut")
    );
}
