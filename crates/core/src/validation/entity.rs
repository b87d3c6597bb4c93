//! Whole-entity validation for create (POST) and replace (PUT).
//!
//! Raw documents are converted with the same parsers patches use, so enum
//! names and date patterns are checked identically on every path.

use super::{require_absent_id, require_non_blank, require_present};
use crate::error::{CoreError, CoreResult};
use crate::fields::{parse_date, parse_enum, parse_timestamp};
use crate::models::{
    NewProject, NewSession, NewTask, Project, ProjectDocument, Session, SessionDocument, Task,
    TaskDocument,
};
use crate::status::{Priority, ProjectStatus, StateMachine, TaskStatus};
use crate::types::Timestamp;

/// The id a replace is keyed by. Must be present and non-blank.
pub fn replacement_id(entity: &str, id: &Option<String>) -> CoreResult<String> {
    match id {
        Some(id) if !super::is_blank(id) => Ok(id.clone()),
        _ => Err(CoreError::bad_request(format!(
            "{entity} id is required to replace a {entity}"
        ))),
    }
}

/* --------------------------------------------------------------------------
Project
-------------------------------------------------------------------------- */

pub fn validate_new_project(doc: ProjectDocument) -> CoreResult<NewProject> {
    require_absent_id("Project", &doc.id)?;
    let name = require_non_blank("name", doc.name)?;
    let dead_line = doc
        .dead_line
        .map(|raw| parse_date("deadLine", &raw))
        .transpose()?;
    // No default is written: an absent status stays absent.
    let status = doc
        .status
        .map(|raw| parse_enum::<ProjectStatus>("status", &raw))
        .transpose()?;

    Ok(NewProject {
        name,
        description: doc.description,
        dead_line,
        status,
    })
}

pub fn validate_project_replacement(doc: ProjectDocument, current: &Project) -> CoreResult<Project> {
    let from = current.effective_status();
    if from.is_terminal() {
        return Err(CoreError::bad_request(format!(
            "Project {} is {from} and can no longer be edited",
            current.id
        )));
    }

    let name = require_non_blank("name", doc.name)?;
    let description = require_present("description", doc.description)?;
    let dead_line = parse_date("deadLine", &require_present("deadLine", doc.dead_line)?)?;
    let status: ProjectStatus = parse_enum("status", &require_present("status", doc.status)?)?;
    from.validate_transition(status)?;

    Ok(Project {
        id: current.id.clone(),
        name,
        description: Some(description),
        dead_line: Some(dead_line),
        status: Some(status),
    })
}

/* --------------------------------------------------------------------------
Task
-------------------------------------------------------------------------- */

/// Validate a task create. Status and priority default when absent; an
/// explicit status other than the initial one is rejected.
pub fn validate_new_task(doc: TaskDocument) -> CoreResult<NewTask> {
    require_absent_id("Task", &doc.id)?;
    let name = require_non_blank("name", doc.name)?;
    let project_id = require_non_blank("projectId", doc.project_id)?;
    let current_time = doc
        .current_time
        .map(|raw| parse_timestamp("currentTime", &raw))
        .transpose()?;
    let priority = match doc.priority {
        Some(raw) => parse_enum::<Priority>("priority", &raw)?,
        None => Priority::default(),
    };
    let status = match doc.status {
        Some(raw) => parse_enum::<TaskStatus>("status", &raw)?,
        None => TaskStatus::INITIAL,
    };
    if status != TaskStatus::INITIAL {
        return Err(CoreError::bad_request(format!(
            "A Task must be created with status {}, got {status}",
            TaskStatus::INITIAL
        )));
    }

    Ok(NewTask {
        name,
        description: doc.description,
        project_id,
        current_time,
        priority,
        status,
    })
}

/// Tasks can only be added to a project that is not finished.
pub fn ensure_project_accepts_tasks(project: &Project) -> CoreResult<()> {
    let status = project.effective_status();
    if status.is_terminal() {
        return Err(CoreError::bad_request(format!(
            "Project {} is {status}; no tasks can be added",
            project.id
        )));
    }
    Ok(())
}

pub fn validate_task_replacement(doc: TaskDocument, current: &Task) -> CoreResult<Task> {
    let name = require_non_blank("name", doc.name)?;
    let description = require_present("description", doc.description)?;
    let project_id = require_non_blank("projectId", doc.project_id)?;
    if project_id != current.project_id {
        return Err(CoreError::bad_request(format!(
            "projectId of Task {} cannot change ('{}' -> '{project_id}')",
            current.id, current.project_id
        )));
    }
    let current_time = parse_timestamp(
        "currentTime",
        &require_present("currentTime", doc.current_time)?,
    )?;
    let priority = parse_enum("priority", &require_present("priority", doc.priority)?)?;
    let status: TaskStatus = parse_enum("status", &require_present("status", doc.status)?)?;
    current.status.validate_transition(status)?;

    Ok(Task {
        id: current.id.clone(),
        name,
        description: Some(description),
        project_id,
        current_time: Some(current_time),
        priority,
        status,
    })
}

/* --------------------------------------------------------------------------
Session
-------------------------------------------------------------------------- */

/// Validate a session create. `startTime` defaults to `now`.
pub fn validate_new_session(doc: SessionDocument, now: Timestamp) -> CoreResult<NewSession> {
    require_absent_id("Session", &doc.id)?;
    let task_id = require_non_blank("taskId", doc.task_id)?;
    let start_time = doc
        .start_time
        .map(|raw| parse_timestamp("startTime", &raw))
        .transpose()?
        .unwrap_or(now);
    let end_time = doc
        .end_time
        .map(|raw| parse_timestamp("endTime", &raw))
        .transpose()?;
    check_span(start_time, end_time)?;

    Ok(NewSession {
        task_id,
        user_id: doc.user_id.filter(|id| !super::is_blank(id)),
        start_time,
        end_time,
    })
}

/// Sessions can only be started on a task that is not finished.
pub fn ensure_task_accepts_sessions(task: &Task) -> CoreResult<()> {
    if task.status.is_terminal() {
        return Err(CoreError::bad_request(format!(
            "Task {} is {}; no sessions can be added",
            task.id, task.status
        )));
    }
    Ok(())
}

pub fn validate_session_replacement(doc: SessionDocument, current: &Session) -> CoreResult<Session> {
    let task_id = require_non_blank("taskId", doc.task_id)?;
    if task_id != current.task_id {
        return Err(CoreError::bad_request(format!(
            "taskId of Session {} cannot change ('{}' -> '{task_id}')",
            current.id, current.task_id
        )));
    }
    let start_time = parse_timestamp("startTime", &require_present("startTime", doc.start_time)?)?;
    let end_time = doc
        .end_time
        .map(|raw| parse_timestamp("endTime", &raw))
        .transpose()?;
    check_span(start_time, end_time)?;

    Ok(Session {
        id: current.id.clone(),
        task_id,
        user_id: doc.user_id.filter(|id| !super::is_blank(id)),
        start_time,
        end_time,
    })
}

/// A session may not end before it starts.
pub(crate) fn check_span(start: Timestamp, end: Option<Timestamp>) -> CoreResult<()> {
    match end {
        Some(end) if end < start => Err(CoreError::bad_request(format!(
            "endTime {} precedes startTime {}",
            crate::fields::format_timestamp(end),
            crate::fields::format_timestamp(start)
        ))),
        _ => Ok(()),
    }
}
