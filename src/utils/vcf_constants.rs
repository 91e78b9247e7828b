pub struct VCFConstants {}

impl VCFConstants {
    pub const ALIGNMENT_ARTIFACT_FILTER_NAME: &'static str = "realignment_artifact";
    pub const ALIGNMENT_ARTIFACT_FILTER_DESCRIPTION: &'static str =
        "Supporting reads do not realign confidently to the original locus";
    pub const PASS_FILTER_NAME: &'static str = "PASS";
}
