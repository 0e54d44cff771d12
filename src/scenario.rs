// The walkthrough itself: seventeen requests in a fixed order, each one
// printed as it comes back. Ids and tokens read from earlier responses are
// threaded into later requests; a step whose id is missing is skipped.

use crate::api::{
    ApiClient, ApiResponse, AuthRequest, NewAnswer, NewCategory, NewQuestion, RegisterRequest,
    RoleChange, UpgradeDecision, Vote,
};
use crate::session::{Captured, Identity, Role, Session};
use crate::ui::Reporter;
use anyhow::Result;
use reqwest::Method;
use serde::Serialize;
use std::io::Write;

/// Login details for one of the two accounts the run creates.
#[derive(Debug, Clone, Copy)]
pub struct Account {
    pub name: &'static str,
    pub email: &'static str,
    pub password: &'static str,
}

pub const ADMIN_ACCOUNT: Account = Account {
    name: "Admin",
    email: "admin@quickdesk.com",
    password: "Admin@12345",
};

pub const USER_ACCOUNT: Account = Account {
    name: "User",
    email: "user@quickdesk.com",
    password: "User@12345",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    RegisterAdmin,
    LoginAdmin,
    PromoteAdmin,
    RegisterUser,
    LoginUser,
    RequestUpgrade,
    ListUpgradeRequests,
    ApproveUpgrade,
    CreateQuestion,
    ListQuestions,
    UpvoteQuestion,
    AnswerQuestion,
    CreateCategory,
    ListCategories,
    ListUsers,
    AdminOverview,
    UserStats,
}

impl Step {
    /// Label printed at the top of the step's result block.
    pub fn name(self) -> &'static str {
        match self {
            Step::RegisterAdmin => "Register Admin",
            Step::LoginAdmin => "Login Admin",
            Step::PromoteAdmin => "Promote to Admin",
            Step::RegisterUser => "Register User",
            Step::LoginUser => "Login User",
            Step::RequestUpgrade => "User Requests Role Upgrade",
            Step::ListUpgradeRequests => "Admin Views Upgrade Requests",
            Step::ApproveUpgrade => "Admin Approves Upgrade",
            Step::CreateQuestion => "User Creates Question",
            Step::ListQuestions => "List Questions",
            Step::UpvoteQuestion => "Upvote Question",
            Step::AnswerQuestion => "Answer Question",
            Step::CreateCategory => "Admin Creates Category",
            Step::ListCategories => "List Categories",
            Step::ListUsers => "Admin Views Users",
            Step::AdminOverview => "Admin Dashboard Overview",
            Step::UserStats => "User Dashboard Stats",
        }
    }
}

/// One request that was actually sent.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step: Step,
    pub method: Method,
    pub path: String,
    pub status: u16,
}

/// Everything the run observed. The console output is the primary
/// product; this is for callers that want to inspect the run afterwards.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub steps: Vec<StepOutcome>,
    pub session: Session,
    pub captured: Captured,
}

impl RunReport {
    pub fn ran(&self, step: Step) -> bool {
        self.steps.iter().any(|s| s.step == step)
    }
}

struct Runner<'a, W: Write> {
    api: &'a ApiClient,
    reporter: &'a mut Reporter<W>,
    report: RunReport,
}

impl<'a, W: Write> Runner<'a, W> {
    /// Send, print, record. `auth` picks whose token goes in the header.
    fn step<B: Serialize + ?Sized>(
        &mut self,
        step: Step,
        method: Method,
        path: &str,
        auth: Option<Role>,
        body: Option<&B>,
    ) -> Result<ApiResponse> {
        let token = auth.and_then(|role| self.report.session.token(role));
        let spinner = self.reporter.begin(step.name());
        let resp = self.api.call(method.clone(), path, token, body);
        spinner.finish_and_clear();
        let resp = resp?;

        self.reporter.report(step.name(), &resp)?;
        self.report.steps.push(StepOutcome {
            step,
            method,
            path: path.to_string(),
            status: resp.status.as_u16(),
        });
        Ok(resp)
    }

    fn get(&mut self, step: Step, path: &str, auth: Option<Role>) -> Result<ApiResponse> {
        self.step::<()>(step, Method::GET, path, auth, None)
    }

    fn register(&mut self, step: Step, account: Account) -> Result<()> {
        let body = RegisterRequest {
            name: account.name.into(),
            email: account.email.into(),
            password: account.password.into(),
        };
        self.step(step, Method::POST, "/auth/register", None, Some(&body))?;
        Ok(())
    }

    fn login(&mut self, step: Step, account: Account, role: Role) -> Result<()> {
        let body = AuthRequest {
            email: account.email.into(),
            password: account.password.into(),
        };
        let resp = self.step(step, Method::POST, "/auth/login", None, Some(&body))?;
        self.report.session.login(
            role,
            Identity {
                token: resp.token(),
                user_id: resp.nested_id("user"),
            },
        );
        Ok(())
    }

    fn run(mut self) -> Result<RunReport> {
        self.register(Step::RegisterAdmin, ADMIN_ACCOUNT)?;
        self.login(Step::LoginAdmin, ADMIN_ACCOUNT, Role::Admin)?;

        if let Some(admin_id) = self.report.session.user_id(Role::Admin).map(str::to_owned) {
            let body = RoleChange { role: "admin".into() };
            let path = format!("/admin/users/{}/role", admin_id);
            self.step(Step::PromoteAdmin, Method::PUT, &path, Some(Role::Admin), Some(&body))?;
        }

        self.register(Step::RegisterUser, USER_ACCOUNT)?;
        self.login(Step::LoginUser, USER_ACCOUNT, Role::User)?;

        self.step::<()>(
            Step::RequestUpgrade,
            Method::POST,
            "/auth/request-upgrade",
            Some(Role::User),
            None,
        )?;

        let resp = self.get(Step::ListUpgradeRequests, "/auth/upgrade-requests", Some(Role::Admin))?;
        self.report.captured.upgrade_request_id = resp.first_id_in("requests");

        if let Some(req_id) = self.report.captured.upgrade_request_id.clone() {
            let body = UpgradeDecision { status: "approved".into() };
            let path = format!("/auth/approve-upgrade/{}", req_id);
            self.step(Step::ApproveUpgrade, Method::PUT, &path, Some(Role::Admin), Some(&body))?;
        }

        let body = NewQuestion {
            title: "How to use QuickDesk?".into(),
            description: "Explain features.".into(),
            tags: vec!["help".into(), "intro".into()],
        };
        let resp = self.step(
            Step::CreateQuestion,
            Method::POST,
            "/questions",
            Some(Role::User),
            Some(&body),
        )?;
        self.report.captured.question_id = resp.nested_id("question");

        self.get(Step::ListQuestions, "/questions", None)?;

        if let Some(question_id) = self.report.captured.question_id.clone() {
            let vote = Vote { kind: "up".into() };
            let path = format!("/questions/{}/vote", question_id);
            self.step(Step::UpvoteQuestion, Method::POST, &path, Some(Role::User), Some(&vote))?;

            let answer = NewAnswer {
                text: "You can use QuickDesk for support tickets and Q&A.".into(),
            };
            let path = format!("/questions/{}/answer", question_id);
            self.step(Step::AnswerQuestion, Method::POST, &path, Some(Role::User), Some(&answer))?;
        }

        let body = NewCategory {
            name: "General".into(),
            description: "General topics".into(),
        };
        let resp = self.step(
            Step::CreateCategory,
            Method::POST,
            "/admin/categories",
            Some(Role::Admin),
            Some(&body),
        )?;
        self.report.captured.category_id = resp.nested_id("category");

        self.get(Step::ListCategories, "/admin/categories", Some(Role::Admin))?;
        self.get(Step::ListUsers, "/admin/users", Some(Role::Admin))?;
        self.get(Step::AdminOverview, "/dashboard/admin/overview", Some(Role::Admin))?;
        self.get(Step::UserStats, "/dashboard/user/stats", Some(Role::User))?;

        self.reporter.finish()?;
        Ok(self.report)
    }
}

/// Run every step once, in order, against `api`, printing through
/// `reporter`. Only transport failures stop the run early.
pub fn run<W: Write>(api: &ApiClient, reporter: &mut Reporter<W>) -> Result<RunReport> {
    Runner {
        api,
        reporter,
        report: RunReport::default(),
    }
    .run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_names_are_unique() {
        let all = [
            Step::RegisterAdmin,
            Step::LoginAdmin,
            Step::PromoteAdmin,
            Step::RegisterUser,
            Step::LoginUser,
            Step::RequestUpgrade,
            Step::ListUpgradeRequests,
            Step::ApproveUpgrade,
            Step::CreateQuestion,
            Step::ListQuestions,
            Step::UpvoteQuestion,
            Step::AnswerQuestion,
            Step::CreateCategory,
            Step::ListCategories,
            Step::ListUsers,
            Step::AdminOverview,
            Step::UserStats,
        ];
        let mut names: Vec<&str> = all.iter().map(|s| s.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 17);
    }
}
