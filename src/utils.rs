//! Some utility functions

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::document;
use crate::meeting::Meeting;
use crate::state::Tracker;
use crate::task::{Task, TaskStatus};
use crate::traits::Record;
use crate::week::GroupKey;

/// A debug utility that pretty-prints what the tracker currently shows
pub fn print_week(tracker: &Tracker, today: NaiveDate) {
    println!("WEEK {}", tracker.selected_range(today));

    let choices: Vec<&str> = tracker.status_choices(today).iter().map(TaskStatus::label).collect();
    println!("TASKS (All, {})", choices.join(", "));
    match tracker.grouped_tasks(today) {
        Some(groups) => print_groups(&groups),
        None => tracker.visible_tasks(today).for_each(print_task),
    }

    match tracker.weekly_update_date(today) {
        Some(date) => println!("MEETINGS (Weekly Update on {})", date.format("%d-%m-%Y")),
        None => println!("MEETINGS"),
    }
    tracker.visible_meetings(today).for_each(print_meeting);
}

pub fn print_groups(groups: &BTreeMap<GroupKey, Vec<&Task>>) {
    for (key, tasks) in groups {
        println!("  {}", key);
        for task in tasks {
            print_task(task);
        }
    }
}

pub fn print_task(task: &Task) {
    let status = match task.status() {
        Some(TaskStatus::ToDo) => " ",
        Some(TaskStatus::InProgress) => "~",
        Some(TaskStatus::Done) => "✓",
        None => "?",
    };
    let due = document::format_date(task.due_date());
    println!("    {} {}\t{}\t{}", status, due, task.title(), task.id());
}

pub fn print_meeting(meeting: &Meeting) {
    let date = document::format_date(meeting.date());
    let time = document::format_time(meeting.time());
    println!("    {} {}\t{}\t{}", date, time, meeting.topic(), meeting.link().unwrap_or("-"));
}
