mod user;
pub use user::{UserEntity, UserEntityCreateUpdate};

mod category;
pub use category::{Category, CategoryCreate};

mod course;
pub use course::{Course, CourseCreate};

mod lesson;
pub use lesson::{Lesson, LessonCreate};

mod enrollment;
pub use enrollment::{Enrollment, EnrollmentCreate, EnrollmentRow};

mod progress;
pub use progress::{Progress, ProgressCreate, ProgressRow, ProgressStatus};
