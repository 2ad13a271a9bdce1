use crate::form::LessonRequest;

pub const NO_DISABILITIES: &str = "Not specified";
pub const NO_ACCOMMODATIONS: &str = "None specified";
pub const NO_OBJECTIVES: &str = "Please suggest appropriate objectives";
pub const NO_MATERIALS: &str = "Standard classroom materials";

fn preamble() -> &'static str {
    "Create a detailed special education lesson plan with the following parameters:"
}

fn requirements() -> &'static str {
r#"The lesson plan should include:
1. Clear, measurable objectives aligned with special education standards
2. A detailed breakdown of instructional activities with time allocations
3. Specific accommodations/modifications for the listed disabilities
4. Assessment methods appropriate for diverse learners
5. Differentiation strategies for varying ability levels
6. Suggested visual supports or assistive technology if applicable
7. Behavioral support strategies if needed

Format the lesson plan with clear headings and bullet points for readability."#
}

fn joined_or<T: ToString>(items: &[T], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
    }
}

fn text_or<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    if text.trim().is_empty() {
        fallback
    } else {
        text
    }
}

/// Render the lesson request into the generation prompt. Pure: the same
/// request always yields the same text.
pub fn build_prompt(req: &LessonRequest) -> String {
    format!(
        "{preamble}\n\n\
         Subject: {subject}\n\
         Grade Level: {grade}\n\
         Duration: {duration}\n\
         Student Disabilities: {disabilities}\n\
         Accommodations Needed: {accommodations}\n\
         Learning Objectives: {objectives}\n\
         Available Materials: {materials}\n\n\
         {requirements}\n",
        preamble = preamble(),
        subject = req.subject(),
        grade = req.grade_level(),
        duration = req.duration(),
        disabilities = joined_or(req.disabilities(), NO_DISABILITIES),
        accommodations = joined_or(req.accommodations(), NO_ACCOMMODATIONS),
        objectives = text_or(req.objectives(), NO_OBJECTIVES),
        materials = text_or(req.materials(), NO_MATERIALS),
        requirements = requirements(),
    )
}
