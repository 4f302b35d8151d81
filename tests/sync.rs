//! Scenarios that save and load a tracker to/from a mocked remote repository

use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, NaiveTime};

use weekly_tracker::document;
use weekly_tracker::mock_behaviour::MockBehaviour;
use weekly_tracker::mock_store::MockStore;
use weekly_tracker::provider::feedback::{feedback_channel, SaveEvent};
use weekly_tracker::traits::Record;
use weekly_tracker::{Meeting, Provider, RecordId, Task, TaskPatch, TaskStatus, Tracker, TrackerError};

const PATH: &str = "tracker.json";
const BRANCH: &str = "main";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_provider() -> Provider<MockStore> {
    let _ = env_logger::builder().is_test(true).try_init();
    Provider::new(MockStore::new(), PATH, BRANCH)
}

fn remote_tasks(provider: &Provider<MockStore>) -> Vec<Task> {
    let doc = provider.store().file(PATH, BRANCH).unwrap();
    let workbook = document::parse(&doc.content).unwrap();
    workbook.table::<Task>().unwrap().into_iter().collect()
}

fn titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|t| t.title()).collect()
}

fn sample_tracker() -> Tracker {
    let mut tracker = Tracker::new();
    tracker.add_task("Write report".into(), "quarterly".into(), TaskStatus::ToDo, date(2024, 5, 13));
    tracker.add_task("Review PR".into(), String::new(), TaskStatus::InProgress, date(2024, 5, 14));
    tracker.add_meeting("Standup".into(), date(2024, 5, 14), NaiveTime::from_hms_opt(9, 30, 0).unwrap(), Some("https://meet.example.com/standup".into()));
    tracker
}


#[tokio::test]
async fn test_first_save_creates_the_document() {
    let mut provider = new_provider();
    let mut tracker = sample_tracker();

    let mut other = Tracker::new();
    assert_eq!(provider.load(&mut other).await.unwrap(), false);
    assert_eq!(other, Tracker::new());

    let version = provider.save(&mut tracker).await.unwrap();
    assert_eq!(provider.last_version(), Some(&version));
    assert_eq!(provider.store().file(PATH, BRANCH).unwrap().version, version);

    let mut retrieved = Tracker::new();
    let mut second_provider = Provider::new(provider.store().clone(), PATH, BRANCH);
    assert!(second_provider.load(&mut retrieved).await.unwrap());
    assert_eq!(retrieved.tasks(), tracker.tasks());
    assert_eq!(retrieved.meetings(), tracker.meetings());
    assert_eq!(retrieved.meetings().iter().next().unwrap().link(), Some("https://meet.example.com/standup"));
}

#[tokio::test]
async fn test_in_memory_version_wins() {
    let mut provider = new_provider();

    // the remote knows t1 as "To Do"
    let t1 = Task::new_with_parameters(RecordId::from("t1"), "Ship it".into(), String::new(),
                                       Some(TaskStatus::ToDo), Some(date(2024, 5, 13)), None);
    let mut old = Tracker::new();
    old.replace_tables(vec![t1.clone()].into_iter().collect(), Default::default());
    provider.store_mut().external_edit(PATH, BRANCH, old.to_document().unwrap());

    // the user marked it done, and added t2
    let mut t1_done = t1.clone();
    t1_done.set_status(TaskStatus::Done);
    let t2 = Task::new_with_parameters(RecordId::from("t2"), "Celebrate".into(), String::new(),
                                       Some(TaskStatus::ToDo), Some(date(2024, 5, 17)), None);
    let mut tracker = Tracker::new();
    tracker.replace_tables(vec![t1_done.clone(), t2.clone()].into_iter().collect(), Default::default());

    provider.save(&mut tracker).await.unwrap();
    assert_eq!(remote_tasks(&provider), vec![t1_done, t2]);
    assert_eq!(tracker.tasks().len(), 2);
}

#[tokio::test]
async fn test_external_records_are_kept() {
    let mut provider = new_provider();
    let mut tracker = sample_tracker();
    provider.save(&mut tracker).await.unwrap();

    // someone else adds a task in the remote document
    let mut someone_else = Tracker::new();
    provider.load(&mut someone_else).await.unwrap();
    someone_else.add_task("From a colleague".into(), String::new(), TaskStatus::ToDo, date(2024, 5, 15));
    provider.store_mut().external_edit(PATH, BRANCH, someone_else.to_document().unwrap());

    // ...while we edit ours
    let review = tracker.tasks().iter().find(|t| t.title() == "Review PR").unwrap().id().clone();
    tracker.update_task(&review, TaskPatch { status: Some(TaskStatus::Done), ..TaskPatch::default() }).unwrap();
    provider.save(&mut tracker).await.unwrap();

    assert_eq!(titles(&remote_tasks(&provider)), vec!["Write report", "Review PR", "From a colleague"]);
    assert_eq!(tracker.tasks().get(&review).unwrap().status(), Some(TaskStatus::Done));
    assert_eq!(tracker.tasks().len(), 3);
}

#[tokio::test]
async fn test_deleted_records_come_back() {
    let mut provider = new_provider();
    let mut tracker = sample_tracker();
    provider.save(&mut tracker).await.unwrap();

    let report = tracker.tasks().iter().next().unwrap().id().clone();
    tracker.delete_task(&report).unwrap();
    assert_eq!(tracker.tasks().len(), 1);

    // merging by ID keeps what the remote snapshot has
    provider.save(&mut tracker).await.unwrap();
    assert!(tracker.tasks().get(&report).is_some());
    assert_eq!(remote_tasks(&provider).len(), 2);
}

#[tokio::test]
async fn test_failures_leave_everything_unchanged() {
    let mut provider = new_provider();
    let mut tracker = sample_tracker();
    provider.save(&mut tracker).await.unwrap();
    let saved_version = provider.store().file(PATH, BRANCH).unwrap().version.clone();

    tracker.add_task("Not saved yet".into(), String::new(), TaskStatus::ToDo, date(2024, 5, 16));
    let before = tracker.clone();

    let behaviour = Arc::new(Mutex::new(MockBehaviour{ fetch_behaviour: (0, 1), push_behaviour: (0, 1), ..MockBehaviour::default() }));
    provider.store_mut().set_mock_behaviour(Some(Arc::clone(&behaviour)));

    // fetch fails
    assert!(matches!(provider.save(&mut tracker).await, Err(TrackerError::Transport(_))));
    assert_eq!(tracker, before);
    assert!(matches!(provider.load(&mut tracker).await, Ok(true)));

    // push fails
    let mut tracker = before.clone();
    assert!(matches!(provider.save(&mut tracker).await, Err(TrackerError::Transport(_))));
    assert_eq!(tracker, before);
    assert_eq!(provider.store().file(PATH, BRANCH).unwrap().version, saved_version);

    // nothing is retried, but the next save works
    provider.save(&mut tracker).await.unwrap();
    assert_eq!(remote_tasks(&provider).len(), 3);
}

#[tokio::test]
async fn test_invalid_remote_document() {
    let mut provider = new_provider();
    provider.store_mut().external_edit(PATH, BRANCH, b"[1, 2, 3]".to_vec());

    let mut tracker = sample_tracker();
    let before = tracker.clone();
    assert!(matches!(provider.load(&mut tracker).await, Err(TrackerError::Schema(_))));
    assert!(matches!(provider.save(&mut tracker).await, Err(TrackerError::Schema(_))));
    assert_eq!(tracker, before);
    assert_eq!(provider.store().file(PATH, BRANCH).unwrap().content, b"[1, 2, 3]");
}

#[tokio::test]
async fn test_legacy_document() {
    let mut provider = new_provider();
    // no ID column, no Link column, and a status nobody knows
    let legacy = r#"{"sheets": [
        {"name": "Tasks", "columns": ["Title", "Description", "Status", "DueDate"],
         "rows": [["Old task", "", "Blocked", "2024-05-13"], ["Other", "", "Done", "not a date"]]},
        {"name": "Meetings", "columns": ["Topic", "Date", "Time"],
         "rows": [["Kickoff", "2024-05-13", "10:00"]]}
    ]}"#;
    provider.store_mut().external_edit(PATH, BRANCH, legacy.as_bytes().to_vec());

    let mut tracker = Tracker::new();
    assert!(provider.load(&mut tracker).await.unwrap());
    assert_eq!(tracker.tasks().len(), 2);
    assert!(tracker.tasks().iter().all(|t| t.id().is_empty() == false));
    assert_eq!(tracker.tasks().iter().next().unwrap().status(), None);
    assert_eq!(tracker.tasks().iter().nth(1).unwrap().due_date(), None);

    let kickoff: &Meeting = tracker.meetings().iter().next().unwrap();
    assert_eq!(kickoff.link(), None);
    assert_eq!(kickoff.time(), NaiveTime::from_hms_opt(10, 0, 0));

    // rows are matched with the IDs they were given at load time, instead of being copied
    let old_task = tracker.tasks().iter().next().unwrap().id().clone();
    tracker.update_task(&old_task, TaskPatch { status: Some(TaskStatus::InProgress), ..TaskPatch::default() }).unwrap();
    let ids: Vec<RecordId> = tracker.tasks().iter().map(|t| t.id().clone()).collect();

    provider.save(&mut tracker).await.unwrap();
    let remote = remote_tasks(&provider);
    assert_eq!(remote.iter().map(|t| t.id().clone()).collect::<Vec<_>>(), ids);
    assert_eq!(remote[0].status(), Some(TaskStatus::InProgress));
    assert_eq!(tracker.tasks().len(), 2);
    assert_eq!(tracker.meetings().len(), 1);

    provider.save(&mut tracker).await.unwrap();
    assert_eq!(remote_tasks(&provider).len(), 2);
}

#[tokio::test]
async fn test_save_feedback() {
    let mut provider = new_provider();
    let mut tracker = sample_tracker();

    let (sender, receiver) = feedback_channel();
    assert_eq!(*receiver.borrow(), SaveEvent::NotStarted);
    let version = provider.save_with_feedback(&mut tracker, sender).await.unwrap();
    assert_eq!(*receiver.borrow(), SaveEvent::Pushed{ version });

    provider.store_mut().set_mock_behaviour(Some(Arc::new(Mutex::new(MockBehaviour::fail_now(1)))));
    let (sender, receiver) = feedback_channel();
    assert!(provider.save_with_feedback(&mut tracker, sender).await.is_err());
    assert!(matches!(&*receiver.borrow(), SaveEvent::Failed{ .. }));
}
