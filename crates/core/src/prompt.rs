//! Grading prompt construction.

/// Build the natural-language instruction for the generative API.
///
/// The instruction asks for a palette/tone transformation only: the
/// composition, characters, and objects of the reference frame must be
/// preserved. `style` is a [`crate::styles::StyleOption::prompt`] fragment.
pub fn build_grading_prompt(style: &str) -> String {
    format!(
        "Perform a professional cinematic color grading on this scene. \
         Maintain the exact composition, characters, and objects from the reference image. \
         Transform the entire color palette to a {style} aesthetic. \
         Ensure high dynamic range, professional lighting, and cinematic atmosphere \
         while preserving the original content structure."
    )
}
