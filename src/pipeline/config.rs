use crate::prompts;

/// Default name of the configuration file listed in task plans
pub const DEFAULT_CONFIG_FILE_NAME: &str = "config.yaml";

/// Default fence tag of generated source
pub const DEFAULT_CODE_LANGUAGE: &str = "python";

/// Prompt fragments and naming used by the stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Planning step 2 request (design)
    pub file_list_msg: String,
    /// Planning step 3 request (task list)
    pub task_list_msg: String,
    /// Planning step 4 request (configuration)
    pub config_msg: String,
    /// Task-list entry that is never analysed or generated
    pub config_file_name: String,
    /// Fence tag the coding stage extracts
    pub code_language: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            file_list_msg: prompts::DEFAULT_FILE_LIST_MSG.to_string(),
            task_list_msg: prompts::DEFAULT_TASK_LIST_MSG.to_string(),
            config_msg: prompts::DEFAULT_CONFIG_MSG.to_string(),
            config_file_name: DEFAULT_CONFIG_FILE_NAME.to_string(),
            code_language: DEFAULT_CODE_LANGUAGE.to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_file_name(mut self, name: impl Into<String>) -> Self {
        self.config_file_name = name.into();
        self
    }

    pub fn with_code_language(mut self, language: impl Into<String>) -> Self {
        self.code_language = language.into();
        self
    }

    pub fn with_planning_messages(
        mut self,
        file_list_msg: impl Into<String>,
        task_list_msg: impl Into<String>,
        config_msg: impl Into<String>,
    ) -> Self {
        self.file_list_msg = file_list_msg.into();
        self.task_list_msg = task_list_msg.into();
        self.config_msg = config_msg.into();
        self
    }
}
