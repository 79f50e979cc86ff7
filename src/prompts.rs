//! Prompt templates for the three stages
//!
//! Builders here are pure string assembly. Artifact text is embedded verbatim.

use crate::artifacts::PlanningArtifacts;

/// Name the paper format is announced as in system prompts
pub const PAPER_FORMAT: &str = "json";

pub fn planning_system(paper_format: &str) -> String {
    format!(
        r#"You are an expert researcher and strategic planner with a deep understanding of experimental design and reproducibility in scientific research.
You will receive a research paper in {paper_format} format.
Your task is to create a detailed and efficient plan to reproduce the experiments and methodologies described in the paper.
This plan should align precisely with the paper's methodology, experimental setup, and evaluation metrics.

Instructions:

1. Align with the Paper: Your plan must strictly follow the methods, datasets, model configurations, hyperparameters, and experimental setups described in the paper.
2. Be Clear and Structured: Present the plan in a well-organized and easy-to-follow format, breaking it down into actionable steps.
3. Prioritize Efficiency: Optimize the plan for clarity and practical implementation while ensuring fidelity to the original experiments."#
    )
}

pub fn overall_plan(paper: &str) -> String {
    format!(
        r#"## Paper
{paper}

## Task
1. We want to reproduce the method described in the attached paper.
2. The authors did not release any official code, so we have to plan our own implementation.
3. Before writing any code, please outline a comprehensive plan that covers:
   - Key details from the paper's **Methodology**.
   - Important aspects of **Experiments**, including dataset requirements, experimental settings, hyperparameters, or evaluation metrics.
4. The plan should be as **detailed and informative** as possible to help us write the final code later.

## Requirements
- You don't need to provide the actual code yet; focus on a **thorough, clear strategy**.
- If something is unclear from the paper, mention it explicitly.

## Instruction
The response should give us a strong roadmap, making it easier to write the code later."#
    )
}

pub const DEFAULT_FILE_LIST_MSG: &str = r#"Your goal is to create a concise, usable, and complete software system design for reproducing the paper's method. Use appropriate open-source libraries and keep the overall architecture simple.

Based on the plan for reproducing the paper's main method, please design a concise, usable, and complete software system.
Keep the architecture simple and make effective use of open-source libraries.

-----

## Format Example
[CONTENT]
{
    "Implementation approach": "We will ... ",
    "File list": [
        "main.py",
        "dataset_loader.py",
        "model.py",
        "trainer.py",
        "evaluation.py"
    ],
    "Data structures and interfaces": "\nclassDiagram\n    class Main {\n        +__init__()\n        +run_experiment()\n    }\n",
    "Program call flow": "\nsequenceDiagram\n    participant M as Main\n    M->>M: run_experiment()\n",
    "Anything UNCLEAR": "Need clarification on the exact dataset version and any specialized hyperparameters."
}
[/CONTENT]

## Nodes: "<node>: <type>  # <instruction>"
- Implementation approach: <class 'str'>  # Summarize the chosen solution strategy.
- File list: typing.List[str]  # Only need relative paths. ALWAYS write a main.py or app.py here.
- Data structures and interfaces: typing.Optional[str]  # Use mermaid classDiagram code syntax, including classes, methods (__init__ etc.) and functions with type annotations.
- Program call flow: typing.Optional[str]  # Use sequenceDiagram code syntax, COMPLETE and VERY DETAILED, using CLASSES AND API DEFINED ABOVE accurately.
- Anything UNCLEAR: <class 'str'>  # Mention ambiguities and ask for clarifications.

## Constraint
Format: output wrapped inside [CONTENT][/CONTENT] like the format example, nothing else.

## Action
Follow the instructions for the nodes, generate the output, and ensure it follows the format example."#;

pub const DEFAULT_TASK_LIST_MSG: &str = r#"Your goal is break down tasks according to the PRD/technical design, generate a task list, and analyze task dependencies.
You will break down tasks, analyze dependencies.

You outline a clear PRD/technical design for reproducing the paper's method and experiments.

Now, let's break down tasks according to the PRD/technical design, generate a task list, and analyze task dependencies.
The Logic Analysis should not only consider the dependencies between files but also provide detailed descriptions to assist in writing the code needed to reproduce the paper.

-----

## Format Example
[CONTENT]
{
    "Required packages": [
        "numpy==1.21.0",
        "torch==1.9.0"
    ],
    "Required Other language third-party packages": [
        "No third-party dependencies required"
    ],
    "Logic Analysis": [
        [
            "data_preprocessing.py",
            "DataPreprocessing class ........"
        ],
        [
            "trainer.py",
            "Trainer ....... "
        ],
        [
            "main.py",
            "Entry point  ......."
        ]
    ],
    "Task list": [
        "data_preprocessing.py",
        "trainer.py",
        "main.py"
    ],
    "Full API spec": "openapi: 3.0.0 ...",
    "Shared Knowledge": "Both data_preprocessing.py and trainer.py share ........",
    "Anything UNCLEAR": "Clarification needed on recommended hardware configuration for large-scale experiments."
}
[/CONTENT]

## Nodes: "<node>: <type>  # <instruction>"
- Required packages: typing.Optional[typing.List[str]]  # Provide required third-party packages in requirements.txt format.
- Required Other language third-party packages: typing.List[str]  # List down packages required for non-Python languages. If none, specify "No third-party dependencies required".
- Logic Analysis: typing.List[typing.List[str]]  # Provide a list of files with the classes/methods/functions to be implemented, including dependency analysis and imports. Include as much detailed description as possible.
- Task list: typing.List[str]  # Break down the tasks into a list of filenames, prioritized based on dependency order. The task list must include the previously generated file list.
- Full API spec: <class 'str'>  # Describe all APIs using OpenAPI 3.0 spec that may be used by both frontend and backend. If front-end and back-end communication is not required, leave it blank.
- Shared Knowledge: <class 'str'>  # Detail any shared knowledge, like common utility functions or configuration variables.
- Anything UNCLEAR: <class 'str'>  # Mention any unresolved questions or clarifications needed from the paper or project scope.

## Constraint
Format: output wrapped inside [CONTENT][/CONTENT] like the format example, nothing else.

## Action
Follow the node instructions above, generate your output accordingly, and ensure it follows the given format example."#;

pub const DEFAULT_CONFIG_MSG: &str = r#"You write elegant, modular, and maintainable code. Adhere to Google-style guidelines.

Based on the paper, plan, design specified previously, follow the "Format Example" and generate the code.
Extract the training details from the above paper (e.g., learning rate, batch size, epochs, etc.), follow the "Format example" and generate the code.
DO NOT FABRICATE DETAILS; only use what the paper provides.

You must write `config.yaml`.

ATTENTION: Use '##' to SPLIT SECTIONS, not '#'. Your output format must follow the example below exactly.

-----

# Format Example
## Code: config.yaml
```yaml
## config.yaml
training:
  learning_rate: ...
  batch_size: ...
  epochs: ...
...
```

-----

## Code: config.yaml"#;

pub fn analysis_system(paper_format: &str, config_file_name: &str) -> String {
    format!(
        r#"You are an expert researcher, strategic analyzer and software engineer with a deep understanding of experimental design and reproducibility in scientific research.
You will receive a research paper in {paper_format} format, an overview of the plan, a design in JSON format consisting of "Implementation approach", "File list", "Data structures and interfaces", and "Program call flow", followed by a task in JSON format that includes "Required packages", "Required other language third-party packages", "Logic Analysis", and "Task list", along with a configuration file named "{config_file_name}".

Your task is to conduct a comprehensive logic analysis to accurately reproduce the experiments and methodologies described in the research paper.
This analysis must align precisely with the paper's methodology, experimental setup, and evaluation criteria.

1. Align with the Paper: Your analysis must strictly follow the methods, datasets, model configurations, hyperparameters, and experimental setups described in the paper.
2. Be Clear and Structured: Present your analysis in a logical, well-organized, and actionable format that is easy to follow and implement.
3. Prioritize Efficiency: Optimize the analysis for clarity and practical implementation while ensuring fidelity to the original experiments.
4. Follow design: YOU MUST FOLLOW "Data structures and interfaces". DONT CHANGE ANY DESIGN. Do not use public member functions that do not exist in your design.
5. REFER TO CONFIGURATION: Always reference settings from the {config_file_name} file. Do not invent or assume any values; only use configurations explicitly provided."#
    )
}

fn context_block(paper: &str, planning: &PlanningArtifacts) -> String {
    format!(
        r#"## Paper
{paper}

-----

## Overview of the plan
{overview}

-----

## Design
{design}

-----

## Task
{task}

-----

## Configuration file
```yaml
{config}
```
-----"#,
        overview = planning.overview,
        design = planning.design,
        task = planning.task,
        config = planning.config,
    )
}

pub fn analysis_instruction(
    paper: &str,
    planning: &PlanningArtifacts,
    file: &str,
    seed: &str,
    config_file_name: &str,
) -> String {
    let draft = if seed.trim().is_empty() {
        format!("Write the logic analysis in '{file}'.")
    } else {
        format!("Write the logic analysis in '{file}', which is intended for '{seed}'.")
    };

    format!(
        r#"{context}

## Instruction
Conduct a Logic Analysis to assist in writing the code, based on the paper, the plan, the design, the task and the previously specified configuration file ({config_file_name}).
You DON'T need to provide the actual code yet; focus on a thorough, clear analysis.

{draft}

-----

## Logic Analysis: {file}"#,
        context = context_block(paper, planning),
    )
}

pub fn coding_system(paper_format: &str, config_file_name: &str) -> String {
    format!(
        r#"You are an expert researcher and software engineer with a deep understanding of experimental design and reproducibility in scientific research.
You will receive a research paper in {paper_format} format, an overview of the plan, a Design in JSON format consisting of "Implementation approach", "File list", "Data structures and interfaces", and "Program call flow", followed by a Task in JSON format that includes "Required packages", "Required other language third-party packages", "Logic Analysis", and "Task list", along with a configuration file named "{config_file_name}".
Your task is to write code to reproduce the experiments and methodologies described in the paper.

The code you write must be elegant, modular, and maintainable, adhering to Google-style guidelines.
The code must strictly align with the paper's methodology, experimental setup, and evaluation metrics.
Write code with triple quotes."#
    )
}

/// Inputs of one coding prompt
pub struct CodingPrompt<'a> {
    pub paper: &'a str,
    pub planning: &'a PlanningArtifacts,
    /// Every file done so far, config file included, in completion order
    pub done_names: &'a [String],
    /// Sources of done files, config file excluded, in completion order
    pub done_sources: &'a [(&'a str, &'a str)],
    pub file: &'a str,
    pub analysis: &'a str,
    pub language: &'a str,
    pub config_file_name: &'a str,
}

pub fn coding_instruction(prompt: &CodingPrompt<'_>) -> String {
    let language = prompt.language;
    let file = prompt.file;
    let config_file_name = prompt.config_file_name;

    let code_files: String = prompt
        .done_sources
        .iter()
        .map(|(_, source)| format!("\n```{language}\n{source}\n```\n\n"))
        .collect();

    let done_list = prompt
        .done_names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"# Context
{context}

## Code Files
{code_files}

-----

# Format example
## Code: {file}
```{language}
## {file}
...
```

-----

# Instruction
Based on the paper, plan, design, task and configuration file ({config_file_name}) specified previously, follow "Format example", write the code.

We have [{done_list}].
Next, you must write only the "{file}".
1. Only One file: do your best to implement THIS ONLY ONE FILE.
2. COMPLETE CODE: Your code will be part of the entire project, so please implement complete, reliable, reusable code snippets.
3. Set default value: If there is any setting, ALWAYS SET A DEFAULT VALUE, ALWAYS USE STRONG TYPE AND EXPLICIT VARIABLE. AVOID circular import.
4. Follow design: YOU MUST FOLLOW "Data structures and interfaces". DONT CHANGE ANY DESIGN. Do not use public member functions that do not exist in your design.
5. CAREFULLY CHECK THAT YOU DONT MISS ANY NECESSARY CLASS/FUNCTION IN THIS FILE.
6. Before using a external variable/module, make sure you import it first.
7. Write out EVERY CODE DETAIL, DON'T LEAVE TODO.
8. REFER TO CONFIGURATION: you must use configuration from "{config_file_name}". DO NOT FABRICATE any configuration values.

{analysis}

## Code: {file}"#,
        context = context_block(prompt.paper, prompt.planning),
        analysis = prompt.analysis,
    )
}
