//! Command handlers for the terminal client.

use tokio::sync::mpsc;

use super::output::Output;
use super::Commands;
use crate::api::ApiClient;
use crate::auth::{authorize, Access, FileStore, Route, Session, SessionManager};
use crate::model::{EncodedPdf, Solution, Vote};
use crate::schedule::RefreshTask;
use crate::types::{AnswerId, AppError, Credentials, Result};
use crate::utils::config::ClientConfig;
use crate::views::search::load_catalog;
use crate::views::solution_page::PAPER_DELETED_MESSAGE;
use crate::views::upload::UPLOAD_FAILED_MESSAGE;
use crate::views::{SolutionPageController, UploadForm, Viewer};

/// Everything a command needs.
pub struct Context {
    pub config: ClientConfig,
    pub output: Output,
    pub sessions: SessionManager<FileStore>,
}

impl Context {
    pub fn new(config: ClientConfig, output: Output) -> Self {
        let client = ApiClient::from_config(&config);
        let store = FileStore::new(config.session_path());
        Self {
            config,
            output,
            sessions: SessionManager::new(client, store),
        }
    }

    /// Check `route` against the current session, turning a redirect into an
    /// error the user can act on.
    pub fn enter(&self, route: &Route) -> Result<Option<Session>> {
        let session = self.sessions.current();
        match authorize(route, session.as_ref()) {
            Access::Allow => Ok(session),
            Access::Redirect(Route::Login) => Err(AppError::Auth(
                "Not signed in or session expired; run `biblio login` first".to_string(),
            )),
            Access::Redirect(_) => match route {
                Route::Login | Route::Register => Err(AppError::Auth(format!(
                    "Already signed in as {}; run `biblio logout` first",
                    session.map(|s| s.username).unwrap_or_default()
                ))),
                _ => Err(AppError::Auth(
                    "Only lecturers can do that".to_string(),
                )),
            },
        }
    }

    fn viewer(&self, route: &Route) -> Result<Viewer> {
        let session = self.enter(route)?.ok_or_else(|| {
            AppError::Auth("Not signed in; run `biblio login` first".to_string())
        })?;
        Ok(Viewer::from(&session))
    }

    async fn open_paper(&self, course: &str, year: i32) -> Result<SolutionPageController> {
        let route = Route::paper(course, year);
        let viewer = self.viewer(&route)?;
        let mut controller =
            SolutionPageController::new(self.sessions.client(), viewer, course, year);
        controller.load().await?;
        Ok(controller)
    }
}

pub async fn dispatch(ctx: &Context, command: Commands) -> Result<()> {
    match command {
        Commands::Login { username, password } => login(ctx, username, password).await,
        Commands::Register { username, password } => register(ctx, username, password).await,
        Commands::Logout => logout(ctx),
        Commands::Whoami => whoami(ctx),
        Commands::Papers { filter } => papers(ctx, filter.as_deref()).await,
        Commands::Paper { course, year, save } => paper(ctx, &course, year, save).await,
        Commands::Answers {
            course,
            year,
            question,
            all,
        } => answers(ctx, &course, year, &question, all).await,
        Commands::Watch {
            course,
            year,
            question,
        } => watch(ctx, &course, year, question.as_deref()).await,
        Commands::Vote {
            course,
            year,
            answer,
            direction,
        } => vote(ctx, &course, year, answer, direction).await,
        Commands::Answer {
            course,
            year,
            question,
            html,
            file,
        } => {
            let html = match (html, file) {
                (Some(html), _) => html,
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => {
                    return Err(AppError::Validation("An answer body is required".to_string()))
                }
            };
            submit_answer(ctx, &course, year, &question, &html).await
        }
        Commands::Edit {
            course,
            year,
            answer,
            html,
        } => edit(ctx, &course, year, answer, &html).await,
        Commands::DeleteAnswer {
            course,
            year,
            answer,
        } => delete_answer(ctx, &course, year, answer).await,
        Commands::DeletePaper { course, year, yes } => {
            delete_paper(ctx, &course, year, yes).await
        }
        Commands::Upload {
            course,
            year,
            pdf,
            title,
            questions,
        } => {
            let bytes = std::fs::read(&pdf)?;
            let form = UploadForm {
                course_code: course,
                year: Some(year),
                title,
                questions,
                pdf: Some(EncodedPdf::from_bytes(&bytes)),
            };
            upload(ctx, form).await
        }
    }
}

// ============= Session =============

async fn login(ctx: &Context, username: String, password: String) -> Result<()> {
    ctx.enter(&Route::Login)?;
    let session = ctx
        .sessions
        .login(&Credentials::new(username, password))
        .await?;
    ctx.output.success(&session.greeting());
    Ok(())
}

async fn register(ctx: &Context, username: String, password: String) -> Result<()> {
    ctx.enter(&Route::Register)?;
    let session = ctx
        .sessions
        .register(&Credentials::new(username, password))
        .await?;
    ctx.output.success("Account created");
    ctx.output.success(&session.greeting());
    Ok(())
}

fn logout(ctx: &Context) -> Result<()> {
    ctx.sessions.logout()?;
    ctx.output.success("Signed out");
    Ok(())
}

fn whoami(ctx: &Context) -> Result<()> {
    match ctx.sessions.current() {
        Some(session) if session.is_authenticated() => {
            ctx.output.info(&session.greeting());
            ctx.output.kv("user id", &session.user_id.to_string());
            ctx.output.kv(
                "role",
                if session.is_lecturer() {
                    "lecturer"
                } else {
                    "student"
                },
            );
        }
        Some(_) => ctx.output.warning("Session expired"),
        None => ctx.output.info("Not signed in"),
    }
    Ok(())
}

// ============= Browsing =============

async fn papers(ctx: &Context, filter: Option<&str>) -> Result<()> {
    ctx.enter(&Route::Search)?;
    let catalog = load_catalog(&ctx.sessions.client()).await?;
    let labels = catalog.filter(filter.unwrap_or_default());

    if labels.is_empty() {
        ctx.output.warning("No matching courses");
        return Ok(());
    }

    ctx.output.header("Courses");
    for label in labels {
        let years: Vec<String> = catalog.years(label).iter().map(i32::to_string).collect();
        ctx.output.list_item(&format!("{}  ({})", label, years.join(", ")));
    }
    Ok(())
}

async fn paper(
    ctx: &Context,
    course: &str,
    year: i32,
    save: Option<std::path::PathBuf>,
) -> Result<()> {
    let controller = ctx.open_paper(course, year).await?;
    let page = controller.page();

    ctx.output.header(&format!("{} {}", course, year));
    match page.paper() {
        Some(paper) => {
            ctx.output.kv("title", &paper.title);
            ctx.output.kv("paper id", &paper.paper_id.to_string());
            if let Some(path) = save {
                std::fs::write(&path, paper.pdf.decode()?)?;
                ctx.output.success(&format!("PDF saved to {}", path.display()));
            }
        }
        None => ctx.output.warning("The paper PDF could not be loaded"),
    }

    ctx.output.subheader("Questions");
    for solution in page.solutions() {
        ctx.output.list_item(&question_summary(solution));
    }
    Ok(())
}

fn question_summary(solution: &Solution) -> String {
    match solution.answers().first() {
        Some(top) => format!(
            "{}: {} answer(s), top score {:+}",
            solution.question(),
            solution.answers().len(),
            top.votes
        ),
        None => format!("{}: no answers yet", solution.question()),
    }
}

async fn answers(ctx: &Context, course: &str, year: i32, question: &str, all: bool) -> Result<()> {
    let mut controller = ctx.open_paper(course, year).await?;
    let id = question_id(&controller, question)?;

    controller.toggle(id).await?;
    if all {
        controller.page_mut().show_more(id);
    }

    if let Some(solution) = controller.page().solution(id) {
        ctx.output.solution(solution, controller.viewer().user_id);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Tick {
    Page,
    ActiveSolution,
}

async fn watch(ctx: &Context, course: &str, year: i32, question: Option<&str>) -> Result<()> {
    let mut controller = ctx.open_paper(course, year).await?;
    if let Some(question) = question {
        let id = question_id(&controller, question)?;
        controller.toggle(id).await?;
        controller.page_mut().show_more(id);
    }
    render_page(ctx, &controller);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let page_tx = tx.clone();
    let _page_task = RefreshTask::spawn(ctx.config.refresh.page(), move || {
        let _ = page_tx.send(Tick::Page);
    });
    let _active_task = RefreshTask::spawn(ctx.config.refresh.active_solution(), move || {
        let _ = tx.send(Tick::ActiveSolution);
    });

    ctx.output.hint("Watching for new answers, press Ctrl-C to stop");
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            tick = rx.recv() => {
                let Some(tick) = tick else { break };
                let changed = match tick {
                    Tick::Page => controller.refresh_page().await > 0,
                    Tick::ActiveSolution => match controller.refresh_active().await {
                        Ok(refreshed) => refreshed,
                        Err(e) => {
                            tracing::warn!("Refresh failed: {}", e);
                            false
                        }
                    },
                };
                if changed {
                    render_page(ctx, &controller);
                }
            }
        }
    }

    ctx.output.newline();
    ctx.output.info("Stopped watching");
    Ok(())
}

fn render_page(ctx: &Context, controller: &SolutionPageController) {
    let page = controller.page();
    ctx.output.header(&format!("{} {}", page.course_code(), page.year()));
    for solution in page.solutions() {
        if solution.is_hidden() {
            ctx.output.list_item(&question_summary(solution));
        } else {
            ctx.output.solution(solution, controller.viewer().user_id);
        }
    }
}

fn question_id(controller: &SolutionPageController, question: &str) -> Result<u64> {
    controller
        .page()
        .solution_by_number(question)
        .map(Solution::id)
        .ok_or_else(|| {
            AppError::Validation(format!("No question '{}' on this paper", question))
        })
}

fn question_of(controller: &SolutionPageController, answer: AnswerId) -> Result<u64> {
    controller
        .page()
        .find_answer(answer)
        .map(|(solution, _)| solution.id())
        .ok_or_else(|| AppError::Validation(format!("No answer #{} on this paper", answer)))
}

// ============= Answers =============

async fn vote(ctx: &Context, course: &str, year: i32, answer: AnswerId, direction: Vote) -> Result<()> {
    let mut controller = ctx.open_paper(course, year).await?;
    let question = question_of(&controller, answer)?;
    let votes = controller.vote(question, answer, direction).await?;
    ctx.output
        .success(&format!("Answer #{} now has {} vote(s)", answer, votes));
    Ok(())
}

async fn submit_answer(
    ctx: &Context,
    course: &str,
    year: i32,
    question: &str,
    html: &str,
) -> Result<()> {
    let mut controller = ctx.open_paper(course, year).await?;
    let id = question_id(&controller, question)?;
    let answer = controller.submit_answer(id, html).await?;
    ctx.output
        .success(&format!("Posted answer #{} to {}", answer, question));
    Ok(())
}

async fn edit(ctx: &Context, course: &str, year: i32, answer: AnswerId, html: &str) -> Result<()> {
    let mut controller = ctx.open_paper(course, year).await?;
    controller.begin_edit(answer)?;
    controller.submit_edit(html).await?;
    ctx.output.success(&format!("Answer #{} updated", answer));
    Ok(())
}

async fn delete_answer(ctx: &Context, course: &str, year: i32, answer: AnswerId) -> Result<()> {
    let mut controller = ctx.open_paper(course, year).await?;
    controller.delete_answer(answer).await?;
    ctx.output.success(&format!("Answer #{} deleted", answer));
    Ok(())
}

// ============= Papers =============

async fn delete_paper(ctx: &Context, course: &str, year: i32, yes: bool) -> Result<()> {
    ctx.enter(&Route::Upload)?;
    let mut controller = ctx.open_paper(course, year).await?;

    if !yes && !ctx.output.confirm(&format!("Delete {} {}?", course, year)) {
        ctx.output.info("Nothing deleted");
        return Ok(());
    }

    controller.delete_paper().await?;
    ctx.output.success(PAPER_DELETED_MESSAGE);
    Ok(())
}

async fn upload(ctx: &Context, form: UploadForm) -> Result<()> {
    ctx.enter(&Route::Upload)?;
    let upload = form.validate()?;

    match upload.submit(&ctx.sessions.client()).await {
        Ok(paper_id) => {
            ctx.output.success(&format!("Uploaded paper {}", paper_id));
            ctx.output.command(&format!(
                "biblio paper {} {}",
                upload.paper.course, upload.paper.year
            ));
            Ok(())
        }
        Err(e @ AppError::PartialUpload { .. }) => {
            ctx.output.error(UPLOAD_FAILED_MESSAGE);
            Err(e)
        }
        Err(e) => Err(e),
    }
}
