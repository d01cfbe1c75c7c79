//! Diesel schema for report persistence.

diesel::table! {
    /// Daily submissions in the legacy flat column layout.
    task_submissions (id) {
        /// Auto-incrementing identifier.
        id -> Int4,
        /// Report date.
        submission_date -> Date,
        /// Reporting user.
        user_names -> Text,
        /// Spatial completed count.
        spatial_completed -> Nullable<Int4>,
        /// Spatial hours.
        spatial_hours -> Nullable<Float8>,
        /// Spatial batches as a JSON array.
        spatial_batches -> Nullable<Text>,
        /// Textual completed count.
        textual_completed -> Nullable<Int4>,
        /// Textual hours.
        textual_hours -> Nullable<Float8>,
        /// Textual batches as a JSON array.
        textual_batches -> Nullable<Text>,
        /// QA completed count.
        qa_completed -> Nullable<Int4>,
        /// QA hours.
        qa_hours -> Nullable<Float8>,
        /// QA batches as a JSON array.
        qa_batches -> Nullable<Text>,
        /// QC completed count.
        qc_completed -> Nullable<Int4>,
        /// QC hours.
        qc_hours -> Nullable<Float8>,
        /// QC batches as a JSON array.
        qc_batches -> Nullable<Text>,
        /// Automation progress percentage.
        automation_completed -> Nullable<Float8>,
        /// Automation hours.
        automation_hours -> Nullable<Float8>,
        /// Automation batches as a JSON array.
        automation_batches -> Nullable<Text>,
        /// Other completed count.
        other_completed -> Nullable<Int4>,
        /// Other hours.
        other_hours -> Nullable<Float8>,
        /// Other batches as a JSON array.
        other_batches -> Nullable<Text>,
        /// Overtime hours.
        overtime_hours -> Nullable<Float8>,
        /// Total hours computed at entry.
        total_hours -> Nullable<Float8>,
        /// Free-text note.
        note -> Nullable<Text>,
        /// Who entered the report.
        submitted_by -> Nullable<Text>,
        /// Creation timestamp; `NULL` in some dashboard rows.
        submit_time -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Normalized batch rows, one per batch per category.
    submission_batches (submission_id, category, position) {
        /// Owning submission.
        submission_id -> Int4,
        /// Category name.
        category -> Text,
        /// Position within the category's batch list.
        position -> Int4,
        /// Batch name.
        batch -> Text,
    }
}

diesel::table! {
    /// Singleton settings row.
    app_settings (id) {
        /// Always 1.
        id -> Int4,
        /// Daily spatial target.
        spatial_target -> Nullable<Int4>,
        /// Daily textual target.
        textual_target -> Nullable<Int4>,
    }
}

diesel::table! {
    /// Batch registry.
    batch_options (name) {
        /// Batch name.
        name -> Text,
    }
}

diesel::table! {
    /// Name to team function mapping.
    team_members (name) {
        /// Member name.
        name -> Text,
        /// Team function label.
        team_function -> Nullable<Text>,
    }
}

diesel::joinable!(submission_batches -> task_submissions (submission_id));

diesel::allow_tables_to_appear_in_same_query!(task_submissions, submission_batches);
