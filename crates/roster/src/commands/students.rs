//! Student command handlers.
//!
//! Each command drives the same view model the terminal UI uses for the
//! matching screen, then renders its state once.

use chrono::{DateTime, Utc};
use tabled::Tabled;

use roster_core::{
    DELETE_CONFIRMATION, DetailState, DetailViewModel, FormMode, FormViewModel, ListViewModel,
    RemoteStudents, SortField, Student, StudentId,
};

use crate::cli::{GlobalOpts, StudentsArgs, StudentsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct StudentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Student> for StudentRow {
    fn from(s: &Student) -> Self {
        Self {
            id: s.id.to_string(),
            code: s.student_code.clone(),
            name: s.name.clone(),
            status: s.status_label().into(),
        }
    }
}

fn timestamp(ts: Option<&DateTime<Utc>>) -> String {
    ts.map_or_else(
        || "-".into(),
        |t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

fn detail(s: &Student) -> String {
    [
        format!("ID:        {}", s.id),
        format!("Code:      {}", s.student_code),
        format!("Name:      {}", s.name),
        format!("Status:    {}", s.status_label()),
        format!("Created:   {}", timestamp(s.created_at.as_ref())),
        format!("Updated:   {}", timestamp(s.updated_at.as_ref())),
    ]
    .join("\n")
}

fn print_student(student: &Student, global: &GlobalOpts) {
    let out = output::render_single(global.output(), student, detail, |s| s.id.to_string());
    output::print_output(&out, global.quiet);
}

fn notice(message: Option<&str>, global: &GlobalOpts) {
    if let Some(message) = message {
        output::print_notice(message, global.color(), global.quiet);
    }
}

// ── Handler ─────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
pub async fn handle(
    api: RemoteStudents,
    args: StudentsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        StudentsCommand::List { search, sort, desc } => {
            let mut vm = ListViewModel::new(api);
            let bar = util::spinner("Fetching students", global.quiet);
            let fetched = vm.refresh().await;
            bar.finish_and_clear();
            fetched?;

            let field = SortField::from(sort);
            if field != vm.sort_field() {
                vm.toggle_sort(field);
            }
            if desc {
                vm.toggle_sort(field);
            }
            if let Some(term) = search {
                vm.set_search_term(term);
            }

            let rows = vm.derived_rows();
            let out = output::render_list(
                global.output(),
                &rows,
                |s| StudentRow::from(*s),
                |s| s.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StudentsCommand::Get { id } => {
            let mut vm = DetailViewModel::new(api, StudentId::from(id.as_str()));
            let bar = util::spinner("Fetching student", global.quiet);
            let loaded = vm.load().await;
            bar.finish_and_clear();
            loaded.map_err(|e| util::for_id(e, &id))?;

            match vm.render_state() {
                DetailState::Present(student) => {
                    print_student(student, global);
                    Ok(())
                }
                DetailState::NotFound => Err(CliError::not_found(id)),
                DetailState::Error(message) => Err(CliError::Api {
                    message: message.to_owned(),
                    status: None,
                }),
                DetailState::Loading => Err(CliError::Api {
                    message: "request did not complete".into(),
                    status: None,
                }),
            }
        }

        StudentsCommand::Add {
            code,
            name,
            inactive,
        } => {
            let mut vm = FormViewModel::new(api, FormMode::Add);
            vm.set_student_code(code);
            vm.set_name(name);
            vm.set_active(!inactive);

            let created = vm.submit().await?;
            notice(vm.success(), global);
            if let Some(student) = created {
                print_student(&student, global);
            }
            Ok(())
        }

        StudentsCommand::Edit {
            id,
            name,
            active,
            inactive,
        } => {
            let mut vm = FormViewModel::new(api, FormMode::Edit(StudentId::from(id.as_str())));
            vm.load().await.map_err(|e| util::for_id(e, &id))?;

            if let Some(name) = name {
                vm.set_name(name);
            }
            if active {
                vm.set_active(true);
            } else if inactive {
                vm.set_active(false);
            }

            let updated = vm.submit().await.map_err(|e| util::for_id(e, &id))?;
            notice(vm.success(), global);
            if let Some(student) = updated {
                print_student(&student, global);
            }
            Ok(())
        }

        StudentsCommand::Delete { id } => {
            if !util::confirm(DELETE_CONFIRMATION, global.yes)? {
                return Ok(());
            }
            let mut vm = ListViewModel::new(api);
            vm.delete_student(&StudentId::from(id.as_str()))
                .await
                .map_err(|e| util::for_id(e, &id))?;

            notice(vm.last_success(), global);
            Ok(())
        }

        StudentsCommand::Toggle { id } => {
            let mut vm = ListViewModel::new(api);
            vm.refresh().await?;
            let sid = StudentId::from(id.as_str());
            let student = vm
                .find(&sid)
                .cloned()
                .ok_or_else(|| CliError::not_found(id.as_str()))?;

            vm.toggle_status(&student)
                .await
                .map_err(|e| util::for_id(e, &id))?;

            notice(vm.last_success(), global);
            // Only what the follow-up fetch returned is shown.
            match vm.find(&sid) {
                Some(current) => print_student(current, global),
                None => notice(vm.error(), global),
            }
            Ok(())
        }
    }
}
