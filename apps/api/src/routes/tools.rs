use axum::Json;
use serde::Serialize;

/// One agent-callable operation and where it lives.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

pub const TOOLS: &[ToolDescriptor] = &[
    ToolDescriptor {
        name: "store_resume",
        method: "POST",
        path: "/api/v1/resumes",
        description: "Store a JSON Resume document and get its id and content units",
    },
    ToolDescriptor {
        name: "list_resumes",
        method: "GET",
        path: "/api/v1/resumes",
        description: "List stored résumés, most recently updated first",
    },
    ToolDescriptor {
        name: "get_resume",
        method: "GET",
        path: "/api/v1/resumes/:id",
        description: "Fetch a stored résumé with content-unit identifiers",
    },
    ToolDescriptor {
        name: "delete_resume",
        method: "DELETE",
        path: "/api/v1/resumes/:id",
        description: "Delete a stored résumé and its version history",
    },
    ToolDescriptor {
        name: "import_resume_from_pdf",
        method: "POST",
        path: "/api/v1/resumes/import-pdf",
        description: "Import a PDF résumé (raw bytes) and store the result",
    },
    ToolDescriptor {
        name: "export_text",
        method: "GET",
        path: "/api/v1/resumes/:id/export",
        description: "Render a stored résumé as text with the modern, classic or executive template",
    },
    ToolDescriptor {
        name: "export_json_resume",
        method: "GET",
        path: "/api/v1/resumes/:id/json-resume",
        description: "Export a stored résumé as standard JSON Resume without identifiers",
    },
    ToolDescriptor {
        name: "update_basics",
        method: "PATCH",
        path: "/api/v1/resumes/:id/basics",
        description: "Change name, contact details, location or summary; blank clears a field",
    },
    ToolDescriptor {
        name: "set_target_industry",
        method: "PUT",
        path: "/api/v1/resumes/:id/target",
        description: "Record the industry and roles the résumé targets",
    },
    ToolDescriptor {
        name: "add_work_experience",
        method: "POST",
        path: "/api/v1/resumes/:id/work",
        description: "Add a work entry with optional highlights",
    },
    ToolDescriptor {
        name: "update_work_experience",
        method: "PATCH",
        path: "/api/v1/resumes/:id/work/:entry",
        description: "Change fields of a work entry; highlights, when given, replace the list",
    },
    ToolDescriptor {
        name: "add_education",
        method: "POST",
        path: "/api/v1/resumes/:id/education",
        description: "Add an education entry",
    },
    ToolDescriptor {
        name: "add_skill",
        method: "POST",
        path: "/api/v1/resumes/:id/skills",
        description: "Add keywords to a skill category, creating it if needed",
    },
    ToolDescriptor {
        name: "add_project",
        method: "POST",
        path: "/api/v1/resumes/:id/projects",
        description: "Add a project with optional highlights and keywords",
    },
    ToolDescriptor {
        name: "add_certification",
        method: "POST",
        path: "/api/v1/resumes/:id/certificates",
        description: "Add a certification",
    },
    ToolDescriptor {
        name: "add_language",
        method: "POST",
        path: "/api/v1/resumes/:id/languages",
        description: "Add a spoken language and fluency",
    },
    ToolDescriptor {
        name: "add_interest",
        method: "POST",
        path: "/api/v1/resumes/:id/interests",
        description: "Add an interest, merging keywords into an existing one of the same name",
    },
    ToolDescriptor {
        name: "delete_entry",
        method: "DELETE",
        path: "/api/v1/resumes/:id/entries/:entry",
        description: "Remove an entry, highlight or the summary by identifier",
    },
    ToolDescriptor {
        name: "analyze_job_description",
        method: "POST",
        path: "/api/v1/jobs/analyze",
        description: "Extract keywords, requirements, seniority and tone from a job description or URL",
    },
    ToolDescriptor {
        name: "score_resume",
        method: "POST",
        path: "/api/v1/score",
        description: "Score a résumé against a job description without changing anything",
    },
    ToolDescriptor {
        name: "get_missing_keywords",
        method: "POST",
        path: "/api/v1/score/missing-keywords",
        description: "List matched and missing job keywords for a résumé",
    },
    ToolDescriptor {
        name: "start_interactive_optimization",
        method: "POST",
        path: "/api/v1/sessions",
        description: "Open an optimization session over a private copy of a résumé",
    },
    ToolDescriptor {
        name: "get_session",
        method: "GET",
        path: "/api/v1/sessions/:id",
        description: "Session status, per-unit state and current predicted score",
    },
    ToolDescriptor {
        name: "get_next_optimization",
        method: "GET",
        path: "/api/v1/sessions/:id/next",
        description: "The untouched or rejected unit with the most weaknesses",
    },
    ToolDescriptor {
        name: "generate_bullet_options",
        method: "POST",
        path: "/api/v1/sessions/:id/units/:unit/options",
        description: "Ranked rewrite options for one content unit",
    },
    ToolDescriptor {
        name: "generate_summary_options",
        method: "POST",
        path: "/api/v1/sessions/:id/summary/options",
        description: "Ranked rewrite options for the professional summary",
    },
    ToolDescriptor {
        name: "regenerate_options",
        method: "POST",
        path: "/api/v1/sessions/:id/units/:unit/regenerate",
        description: "A new round of options that repeats nothing shown before",
    },
    ToolDescriptor {
        name: "select_optimization_option",
        method: "POST",
        path: "/api/v1/sessions/:id/units/:unit/accept",
        description: "Apply one of the current options to the working copy",
    },
    ToolDescriptor {
        name: "reject_options",
        method: "POST",
        path: "/api/v1/sessions/:id/units/:unit/reject",
        description: "Discard the current options for a unit",
    },
    ToolDescriptor {
        name: "finalize_optimization",
        method: "POST",
        path: "/api/v1/sessions/:id/finalize",
        description: "Re-score, close the session and save the result for stored résumés",
    },
    ToolDescriptor {
        name: "abandon_optimization",
        method: "POST",
        path: "/api/v1/sessions/:id/abandon",
        description: "Discard the working copy without saving",
    },
];

/// GET /api/v1/tools
pub async fn handle_list_tools() -> Json<&'static [ToolDescriptor]> {
    Json(TOOLS)
}
