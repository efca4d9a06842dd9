use clap::{Parser, Subcommand};
use learnhub::error::AppResult;
use learnhub::model::entity::{
    Category, CategoryCreate, Course, CourseCreate, Enrollment, EnrollmentCreate, EnrollmentRow,
    Lesson, LessonCreate, Progress, ProgressStatus, UserEntity, UserEntityCreateUpdate,
};
use learnhub::model::{
    CrudRepository, DatabaseError, DbConnection, Instructor, ModelManager, Student, UserRole,
};

#[derive(Parser, Debug)]
#[command(about = "CLI tool for filling the course platform DB", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending schema migrations
    Migrate,

    /// Manage users
    User {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        action: CategoryCommands,
    },

    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Manage lessons
    Lesson {
        #[command(subcommand)]
        action: LessonCommands,
    },

    /// Manage enrollments
    Enrollment {
        #[command(subcommand)]
        action: EnrollmentCommands,
    },

    /// Manage lesson progress
    Progress {
        #[command(subcommand)]
        action: ProgressCommands,
    },
}

/// User management
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        /// `student` or `instructor`
        #[arg(long, default_value = "student")]
        role: UserRole,
    },
}

/// Category management
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    Add {
        #[arg(long)]
        name: String,
    },
}

/// Course management
#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Email of the instructor owning the course
        #[arg(long)]
        instructor_email: String,
        /// Category name to attach the course to
        #[arg(long)]
        category: Option<String>,
    },
}

/// Lesson management
#[derive(Subcommand, Debug)]
pub enum LessonCommands {
    Add {
        /// Course title to attach the lesson to
        #[arg(long)]
        course_title: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        video_url: String,
    },
}

/// Enrollment management
#[derive(Subcommand, Debug)]
pub enum EnrollmentCommands {
    Add {
        #[arg(long)]
        student_email: String,
        #[arg(long)]
        course_title: String,
    },
    List {
        #[arg(long)]
        student_email: String,
    },
}

/// Progress management
#[derive(Subcommand, Debug)]
pub enum ProgressCommands {
    Set {
        #[arg(long)]
        student_email: String,
        #[arg(long)]
        course_title: String,
        #[arg(long)]
        lesson_title: String,
        /// `not_started`, `in_progress` or `completed`
        #[arg(long)]
        status: ProgressStatus,
    },
}

fn not_found(what: &str, key: &str) -> DatabaseError {
    DatabaseError::validation(format!("{what} `{key}` not found"))
}

async fn user_by_email(mm: &ModelManager, email: &str) -> AppResult<UserEntity> {
    Ok(UserEntity::find_by_email(mm, email)
        .await?
        .ok_or_else(|| not_found("user", email))?)
}

async fn course_by_title(mm: &ModelManager, title: &str) -> AppResult<Course> {
    Ok(Course::find_by_title(mm, title)
        .await?
        .ok_or_else(|| not_found("course", title))?)
}

async fn run(args: Cli) -> AppResult<()> {
    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| DatabaseError::validation("DATABASE_URL is not set"))?;
    let mm = ModelManager::new(DbConnection::connect(&database_url)?);

    match args.command {
        Commands::Migrate => {
            mm.database().migrate().await?;
            println!("Migrations applied");
        }

        Commands::User { action } => match action {
            UserCommands::Add { name, email, role } => {
                let user = UserEntity::create(&mm, UserEntityCreateUpdate { name, email, role }).await?;
                println!("User created: {} ({}, {})", user, user.id(), user.role());
            }
        },

        Commands::Category { action } => match action {
            CategoryCommands::Add { name } => {
                let category = Category::create(&mm, CategoryCreate { name }).await?;
                println!("Category created: {} ({})", category, category.id());
            }
        },

        Commands::Course { action } => match action {
            CourseCommands::Add { title, description, instructor_email, category } => {
                let instructor = Instructor::try_from(user_by_email(&mm, &instructor_email).await?)?;
                let category_id = match category {
                    Some(name) => Some(
                        Category::find_by_name(&mm, &name)
                            .await?
                            .ok_or_else(|| not_found("category", &name))?
                            .id(),
                    ),
                    None => None,
                };

                let course = Course::create(
                    &mm,
                    CourseCreate::new(title, description, &instructor, category_id),
                )
                .await?;
                println!("Course created: {} ({})", course, course.id());
            }
        },

        Commands::Lesson { action } => match action {
            LessonCommands::Add { course_title, title, video_url } => {
                let course = course_by_title(&mm, &course_title).await?;
                let lesson = Lesson::create(
                    &mm,
                    LessonCreate {
                        course_id: course.id(),
                        title,
                        video_url,
                    },
                )
                .await?;
                println!("Lesson created: {} ({})", lesson, lesson.id());
            }
        },

        Commands::Enrollment { action } => match action {
            EnrollmentCommands::Add { student_email, course_title } => {
                let student = Student::try_from(user_by_email(&mm, &student_email).await?)?;
                let course = course_by_title(&mm, &course_title).await?;
                let enrollment = Enrollment::create(&mm, EnrollmentCreate::new(&student, course.id())).await?;
                println!(
                    "Enrolled: {} - {} at {}",
                    student,
                    course,
                    enrollment.enrolled_at()
                );
            }
            EnrollmentCommands::List { student_email } => {
                let student = user_by_email(&mm, &student_email).await?;
                for row in EnrollmentRow::all_by_student(&mm, student.id()).await? {
                    println!("{row} ({})", row.enrolled_at);
                }
            }
        },

        Commands::Progress { action } => match action {
            ProgressCommands::Set { student_email, course_title, lesson_title, status } => {
                let student = Student::try_from(user_by_email(&mm, &student_email).await?)?;
                let course = course_by_title(&mm, &course_title).await?;
                let lesson = Lesson::find_by_title(&mm, course.id(), &lesson_title)
                    .await?
                    .ok_or_else(|| not_found("lesson", &lesson_title))?;

                let progress = Progress::set_status(&mm, &student, lesson.id(), status).await?;
                println!("Progress: {} - {}: {}", student, lesson, progress.status());
            }
        },
    }

    Ok(())
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // also loads .env
    learnhub::setup_trace();
    let args = Cli::parse();
    tracing::debug!("running {:?}", args.command);
    run(args).await
}
