//! Interactive shell.
//!
//! One event loop owns the session. Input lines and notice expirations are
//! the only two event sources, so every transition runs to completion
//! before the next one starts.

use std::io::Write;

use anyhow::anyhow;
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};

use planner_core::assist::AssistService;
use planner_core::domain::{NoticeId, PostBody, PostId};
use planner_core::ports::AssistError;
use planner_core::session::DraftEdit;
use planner_core::{Action, DomainError, Outcome, View};
use planner_infra::DismissTimer;

use crate::commands::{self, HELP, ShellCommand};
use crate::config::AppConfig;
use crate::render;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    state: AppState,
    timer: DismissTimer,
    ideas: Vec<String>,
    pending_delete: Option<PostId>,
}

/// Run the shell until `quit` or end of input.
pub async fn run(state: AppState, config: &AppConfig) -> anyhow::Result<()> {
    let (timer, mut expired) = DismissTimer::new(config.notice_ttl);
    let mut shell = Shell::new(state, timer);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Content planner. Type 'help' for commands.");
    if let Some(version) = shell.state.session.repository().foreign_version() {
        println!(
            "Saved posts use a newer format (version {version}). Changes in this session will not be saved."
        );
    }
    shell.print_dashboard();
    shell.prompt();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if shell.handle(&line).await == Flow::Quit {
                    break;
                }
                shell.prompt();
            }
            Some(id) = expired.recv() => {
                shell.state.session.dispatch(Action::DismissNotice(id))?;
            }
        }
    }

    tracing::info!("Shell closed");
    Ok(())
}

impl Shell {
    pub fn new(state: AppState, timer: DismissTimer) -> Self {
        Self {
            state,
            timer,
            ideas: Vec::new(),
            pending_delete: None,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Handle one input line.
    pub async fn handle(&mut self, line: &str) -> Flow {
        if let Some(id) = self.pending_delete.take() {
            self.confirm_delete(id, line);
            return Flow::Continue;
        }

        let command = match commands::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Flow::Continue,
            Err(e) => {
                println!("{e}");
                return Flow::Continue;
            }
        };

        match self.execute(command).await {
            Ok(flow) => flow,
            Err(e) => {
                println!("{e}");
                Flow::Continue
            }
        }
    }

    async fn execute(&mut self, command: ShellCommand) -> anyhow::Result<Flow> {
        match command {
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::List => self.print_dashboard(),
            ShellCommand::Filter(filter) => {
                self.dispatch(Action::SetFilter(filter))?;
                self.print_dashboard();
            }
            ShellCommand::New => {
                self.dispatch(Action::NewPost)?;
                self.print_draft()?;
            }
            ShellCommand::Edit(id) => {
                if self.dispatch(Action::EditPost(id.clone()))? == Outcome::Ignored {
                    println!("No post with id {id}.");
                } else {
                    self.print_draft()?;
                }
            }
            ShellCommand::Delete(id) => {
                if self.state.session.posts().iter().any(|p| p.id() == &id) {
                    println!("Delete post {id}? This cannot be undone. [y/N]");
                    self.pending_delete = Some(id);
                } else {
                    println!("No post with id {id}.");
                }
            }
            ShellCommand::Show => self.print_draft()?,
            ShellCommand::Copy => println!("{}", self.draft_body()?.thread_text()),
            ShellCommand::Text { index, text } => self.edit(DraftEdit::SetText { index, text })?,
            ShellCommand::AddUnit => {
                self.edit(DraftEdit::PushUnit)?;
                self.print_draft()?;
            }
            ShellCommand::RemoveUnit(index) => {
                self.edit(DraftEdit::RemoveUnit { index })?;
                self.print_draft()?;
            }
            ShellCommand::Image { index, reference } => {
                self.edit(DraftEdit::AttachImage { index, reference })?
            }
            ShellCommand::RemoveImage(index) => self.edit(DraftEdit::RemoveImage { index })?,
            ShellCommand::Tone(label) => self.edit(DraftEdit::ToggleTone(label))?,
            ShellCommand::Untone(label) => self.edit(DraftEdit::RemoveTone(label))?,
            ShellCommand::Status(status) => self.edit(DraftEdit::SetStatus(status))?,
            ShellCommand::Schedule(at) => self.edit(DraftEdit::Schedule(at))?,
            ShellCommand::Unschedule => self.edit(DraftEdit::ClearSchedule)?,
            ShellCommand::Hashtag { index, tag } => {
                self.edit(DraftEdit::InsertHashtag { index, tag })?
            }
            ShellCommand::Save => {
                self.dispatch(Action::Save)?;
                self.print_dashboard();
            }
            ShellCommand::Cancel => {
                self.dispatch(Action::Cancel)?;
                self.print_dashboard();
            }
            ShellCommand::Dashboard => {
                self.dispatch(Action::ShowDashboard)?;
                self.print_dashboard();
            }
            ShellCommand::Brainstorm(topic) => {
                self.dispatch(Action::OpenBrainstorm)?;
                let ideas = self.assistant()?.brainstorm(topic.as_deref()).await?;
                for (i, idea) in ideas.iter().enumerate() {
                    println!("{:>2}. {idea}", i + 1);
                }
                if !ideas.is_empty() {
                    println!("Type 'use <n>' to start a draft from an idea.");
                }
                self.ideas = ideas;
            }
            ShellCommand::UseIdea(index) => {
                let idea = self.ideas.get(index).cloned().ok_or_else(|| {
                    anyhow!("No idea #{}. Run 'brainstorm' first.", index + 1)
                })?;
                self.dispatch(Action::UseIdea(idea))?;
                self.print_draft()?;
            }
            ShellCommand::Analyze(text) => {
                self.dispatch(Action::OpenAnalyzer)?;
                println!("{}", self.assistant()?.analyze(&text).await?);
            }
            ShellCommand::Readiness => {
                let body = self.draft_body()?.clone();
                println!("{}", self.assistant()?.check_readiness(&body).await?);
            }
            ShellCommand::Hashtags => {
                let body = self.draft_body()?.clone();
                println!("{}", self.assistant()?.suggest_hashtags(&body).await?);
            }
            ShellCommand::Score => {
                let body = self.draft_body()?.clone();
                print!("{}", render::score(&self.assistant()?.score(&body).await?));
            }
            ShellCommand::Rephrase(index) => {
                let body = self.draft_body()?.clone();
                let text = self.assistant()?.rephrase(&body, index).await?;
                self.rewrite(index, text, "rephrased")?;
            }
            ShellCommand::Format(index) => {
                let body = self.draft_body()?.clone();
                let text = self.assistant()?.format(&body, index).await?;
                self.rewrite(index, text, "formatted")?;
            }
            ShellCommand::Tones => {
                let active = self.state.session.draft().map(|d| d.body().tones());
                print!("{}", render::tones(active));
            }
            ShellCommand::Statuses => print!("{}", render::statuses()),
            ShellCommand::Theme => {
                self.dispatch(Action::ToggleTheme)?;
                println!("Theme: {}", self.state.session.theme());
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Dispatch an action, surfacing and scheduling any notice it raises.
    fn dispatch(&mut self, action: Action) -> Result<Outcome, DomainError> {
        let outcome = self.state.session.dispatch(action)?;
        if let Outcome::Deleted { post, .. } = &outcome {
            println!("Post {} deleted.", post.id());
        }
        if let Some(id) = outcome.notice() {
            self.announce(id);
        }
        Ok(outcome)
    }

    fn edit(&mut self, edit: DraftEdit) -> Result<(), DomainError> {
        self.dispatch(Action::Edit(edit)).map(|_| ())
    }

    /// Replace unit `index` with assistant output and say so.
    fn rewrite(&mut self, index: usize, text: String, verb: &str) -> anyhow::Result<()> {
        self.edit(DraftEdit::SetText { index, text })?;
        let id = self
            .state
            .session
            .notify(format!("Post #{} {verb}!", index + 1));
        self.announce(id);
        self.print_draft()?;
        Ok(())
    }

    fn announce(&mut self, id: NoticeId) {
        if let Some(notice) = self.state.session.notice().filter(|n| n.id == id) {
            println!("✓ {}", notice.message);
        }
        self.timer.schedule(id);
    }

    fn confirm_delete(&mut self, id: PostId, answer: &str) {
        if matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            if let Err(e) = self.dispatch(Action::Delete(id)) {
                println!("{e}");
            }
        } else {
            println!("Delete cancelled.");
        }
    }

    fn assistant(&self) -> anyhow::Result<&AssistService> {
        self.state
            .assistant
            .as_ref()
            .ok_or_else(|| anyhow!(AssistError::NotConfigured))
    }

    fn draft_body(&self) -> Result<&PostBody, DomainError> {
        self.state
            .session
            .draft()
            .map(|d| d.body())
            .ok_or(DomainError::NoActiveDraft)
    }

    fn print_dashboard(&self) {
        let session = &self.state.session;
        let visible = session.visible_posts();
        println!(
            "{} of {} posts (filter: {})",
            visible.len(),
            session.posts().len(),
            session.filter()
        );
        let open_id = session.draft().and_then(|d| d.id()).map(|id| id.as_str());
        let now = Utc::now();
        for post in visible {
            println!("{}", render::post_line(post, open_id, now));
        }
    }

    fn print_draft(&self) -> Result<(), DomainError> {
        let draft = self.state.session.draft().ok_or(DomainError::NoActiveDraft)?;
        print!("{}", render::draft(draft));
        Ok(())
    }

    fn prompt(&self) {
        let label = match self.state.session.view() {
            View::Dashboard => "dashboard",
            View::Editor => "editor",
            View::Brainstorm => "brainstorm",
            View::Analyzer => "analyzer",
        };
        print!("{label}> ");
        let _ = std::io::stdout().flush();
    }
}
