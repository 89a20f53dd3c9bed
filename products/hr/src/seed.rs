//! Demo organization used by `server seed` and the tests.
//!
//! Alice (1) and Dan (4) report to Bob (2). Carol (3) runs HR and has no
//! manager. Logins `employee1`, `manager1` and `hradmin1` map to Alice, Bob
//! and Carol and share the password [`DEMO_PASSWORD`].

use chrono::NaiveDate;
use entity::{
    departments, employee_skills, employees, goals, review_cycles, review_templates, reviews,
    skills, users,
};
use platform_authn::hash_password;
use platform_authz::Role;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
};
use tracing::info;

pub const DEMO_PASSWORD: &str = "password123";

pub struct SeededOrg {
    pub departments: Vec<departments::Model>,
    pub employees: Vec<employees::Model>,
    pub users: Vec<users::Model>,
    pub goals: Vec<goals::Model>,
    pub review_cycles: Vec<review_cycles::Model>,
    pub review_templates: Vec<review_templates::Model>,
    pub reviews: Vec<reviews::Model>,
    pub skills: Vec<skills::Model>,
}

impl SeededOrg {
    pub fn employee_email(&self, email: &str) -> Option<&employees::Model> {
        self.employees.iter().find(|e| e.email == email)
    }

    pub fn username(&self, username: &str) -> Option<&users::Model> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn goal_titled(&self, title: &str) -> Option<&goals::Model> {
        self.goals.iter().find(|g| g.title == title)
    }

    pub fn review_of(&self, reviewee_id: i32) -> Option<&reviews::Model> {
        self.reviews
            .iter()
            .find(|r| r.reviewee_id == Some(reviewee_id))
    }
}

/// Insert the demo organization. Returns `None` without touching anything
/// when employees already exist.
pub async fn seed_demo(db: &DatabaseConnection) -> Result<Option<SeededOrg>, DbErr> {
    if employees::Entity::find().count(db).await? > 0 {
        info!("employees present, skipping demo seed");
        return Ok(None);
    }

    let engineering = insert_department(db, "Engineering").await?;
    let people = insert_department(db, "People Operations").await?;

    let alice = insert_employee(db, "Alice", "Nguyen", "Software Engineer", engineering.id).await?;
    let bob = insert_employee(db, "Bob", "Martin", "Engineering Manager", engineering.id).await?;
    let carol = insert_employee(db, "Carol", "Diaz", "HR Director", people.id).await?;
    let dan = insert_employee(db, "Dan", "Okafor", "QA Engineer", engineering.id).await?;
    let alice = assign_manager(db, alice, bob.id).await?;
    let dan = assign_manager(db, dan, bob.id).await?;

    let users = vec![
        insert_user(db, "employee1", Role::Employee, alice.id).await?,
        insert_user(db, "manager1", Role::Manager, bob.id).await?,
        insert_user(db, "hradmin1", Role::HrAdmin, carol.id).await?,
    ];

    let goals = vec![
        insert_goal(
            db,
            "Ship the review exporter",
            alice.id,
            bob.id,
            "In Progress",
            40,
        )
        .await?,
        insert_goal(db, "Automate regression suite", dan.id, bob.id, "Not Started", 0).await?,
        insert_goal(db, "Grow the platform team", bob.id, carol.id, "In Progress", 60).await?,
    ];

    let review_cycles = vec![
        insert_cycle(db, "Q1 2025", "Quarterly", (2025, 1, 1), (2025, 3, 31)).await?,
        insert_cycle(db, "Q2 2025", "Quarterly", (2025, 4, 1), (2025, 6, 30)).await?,
        insert_cycle(db, "Annual 2025", "Annual", (2025, 1, 1), (2025, 12, 31)).await?,
    ];
    let review_templates = vec![
        insert_template(
            db,
            "Annual Performance Review",
            r#"{"sections":["Goals","Skills","Leadership"]}"#,
        )
        .await?,
        insert_template(
            db,
            "Quarterly Check-in",
            r#"{"sections":["Progress","Challenges","Next Steps"]}"#,
        )
        .await?,
        insert_template(
            db,
            "360 Degree Review",
            r#"{"sections":["Self","Peer","Manager","Subordinate"]}"#,
        )
        .await?,
    ];

    let (q1, annual_form) = (review_cycles[0].id, review_templates[0].id);
    let reviews = vec![
        insert_review(db, (q1, annual_form), bob.id, alice.id, 4, "Consistent delivery").await?,
        insert_review(db, (q1, annual_form), bob.id, dan.id, 3, "Solid first quarter").await?,
        insert_review(db, (q1, annual_form), carol.id, bob.id, 5, "Strong team growth").await?,
    ];

    let rust = insert_skill(db, "Rust", "Systems programming").await?;
    let leadership = insert_skill(db, "Leadership", "Leading and growing people").await?;
    for (employee_id, skill_id, level) in [
        (alice.id, rust.id, 3),
        (dan.id, rust.id, 2),
        (bob.id, leadership.id, 4),
        (carol.id, leadership.id, 5),
    ] {
        employee_skills::ActiveModel {
            employee_id: Set(employee_id),
            skill_id: Set(skill_id),
            proficiency_level: Set(level),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    info!(employees = 4, users = users.len(), "demo organization seeded");
    Ok(Some(SeededOrg {
        departments: vec![engineering, people],
        employees: vec![alice, bob, carol, dan],
        users,
        goals,
        review_cycles,
        review_templates,
        reviews,
        skills: vec![rust, leadership],
    }))
}

async fn insert_department(
    db: &DatabaseConnection,
    name: &str,
) -> Result<departments::Model, DbErr> {
    departments::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
}

async fn insert_employee(
    db: &DatabaseConnection,
    first_name: &str,
    last_name: &str,
    role: &str,
    department_id: i32,
) -> Result<employees::Model, DbErr> {
    employees::ActiveModel {
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        email: Set(format!("{}@company.test", first_name.to_lowercase())),
        role: Set(role.to_string()),
        manager_id: Set(None),
        department_id: Set(Some(department_id)),
        ..Default::default()
    }
    .insert(db)
    .await
}

async fn assign_manager(
    db: &DatabaseConnection,
    employee: employees::Model,
    manager_id: i32,
) -> Result<employees::Model, DbErr> {
    let mut active: employees::ActiveModel = employee.into();
    active.manager_id = Set(Some(manager_id));
    active.update(db).await
}

async fn insert_user(
    db: &DatabaseConnection,
    username: &str,
    role: Role,
    employee_id: i32,
) -> Result<users::Model, DbErr> {
    let password_hash =
        hash_password(DEMO_PASSWORD).map_err(|err| DbErr::Custom(err.to_string()))?;
    users::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(password_hash),
        role: Set(role.as_str().to_string()),
        employee_id: Set(employee_id),
        ..Default::default()
    }
    .insert(db)
    .await
}

async fn insert_goal(
    db: &DatabaseConnection,
    title: &str,
    employee_id: i32,
    manager_id: i32,
    status: &str,
    progress: i32,
) -> Result<goals::Model, DbErr> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();
    let end = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default();
    goals::ActiveModel {
        title: Set(title.to_string()),
        description: Set(format!("{title} by the end of the year")),
        start_date: Set(start),
        end_date: Set(end),
        status: Set(status.to_string()),
        employee_id: Set(employee_id),
        manager_id: Set(Some(manager_id)),
        progress: Set(Some(progress)),
        notes: Set(String::new()),
        ..Default::default()
    }
    .insert(db)
    .await
}

async fn insert_cycle(
    db: &DatabaseConnection,
    name: &str,
    cycle_type: &str,
    (start_year, start_month, start_day): (i32, u32, u32),
    (end_year, end_month, end_day): (i32, u32, u32),
) -> Result<review_cycles::Model, DbErr> {
    let start = NaiveDate::from_ymd_opt(start_year, start_month, start_day).unwrap_or_default();
    let end = NaiveDate::from_ymd_opt(end_year, end_month, end_day).unwrap_or_default();
    review_cycles::ActiveModel {
        name: Set(name.to_string()),
        cycle_type: Set(Some(cycle_type.to_string())),
        start_date: Set(start),
        end_date: Set(end),
        ..Default::default()
    }
    .insert(db)
    .await
}

async fn insert_template(
    db: &DatabaseConnection,
    name: &str,
    structure_json: &str,
) -> Result<review_templates::Model, DbErr> {
    review_templates::ActiveModel {
        name: Set(name.to_string()),
        structure_json: Set(Some(structure_json.to_string())),
        ..Default::default()
    }
    .insert(db)
    .await
}

async fn insert_review(
    db: &DatabaseConnection,
    (cycle_id, template_id): (i32, i32),
    reviewer_id: i32,
    reviewee_id: i32,
    rating: i32,
    comments: &str,
) -> Result<reviews::Model, DbErr> {
    reviews::ActiveModel {
        cycle_id: Set(cycle_id),
        template_id: Set(template_id),
        reviewer_id: Set(Some(reviewer_id)),
        reviewee_id: Set(Some(reviewee_id)),
        rating: Set(rating),
        comments: Set(Some(comments.to_string())),
        is_locked: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
}

async fn insert_skill(
    db: &DatabaseConnection,
    name: &str,
    description: &str,
) -> Result<skills::Model, DbErr> {
    skills::ActiveModel {
        name: Set(name.to_string()),
        description: Set(Some(description.to_string())),
        ..Default::default()
    }
    .insert(db)
    .await
}
