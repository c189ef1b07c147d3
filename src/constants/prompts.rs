pub const ANALYSIS_PROMPT_HEADER: &str = "You are an expert at analyzing collections of lecture materials and synthesizing what they teach.
Analyze every lecture file below. Identify the key concepts and the themes that run across ALL of the materials, and write ONE coherent summary that integrates the information from every file. Do not summarize the files one by one.

## LANGUAGE
- Every output field (key concepts, themes, summary) must be written in the predominant language of the input content.
- If the files are in different languages, use the language of the first file.
- IF THE CONTENT IS IN RUSSIAN, ALL FIELDS IN THE OUTPUT JSON MUST BE STRICTLY IN RUSSIAN.
- ЕСЛИ КОНТЕНТ НА РУССКОМ ЯЗЫКЕ, ВСЕ ПОЛЯ В ВЫХОДНОМ JSON ДОЛЖНЫ БЫТЬ СТРОГО НА РУССКОМ ЯЗЫКЕ.

Images and PDFs are attached to this message in the position of their file markers.

";

pub const ANALYSIS_PROMPT_FOOTER: &str = "
Return the combined key concepts, themes and summary for ALL of the files above as JSON matching the supplied schema.";

/// Placeholders: `{number_of_questions}`, `{difficulty}`, `{question_type}`,
/// `{type_guidance}`, `{lecture_content}`.
pub const QUESTION_GENERATION_PROMPT: &str = "You are an expert educator writing practice test questions for students.
Using the lecture content below, write {number_of_questions} test questions of {difficulty} difficulty.
Every question must be of type: {question_type}.

## LANGUAGE
- Questions, options and answers must be written in the same language as the lecture content.
- IF THE CONTENT IS IN RUSSIAN, ALL OUTPUT (questions, options, answers) IN THE JSON MUST BE STRICTLY IN RUSSIAN.
- ЕСЛИ КОНТЕНТ НА РУССКОМ ЯЗЫКЕ, ВЕСЬ ВЫВОД (вопросы, варианты, ответы) В JSON ДОЛЖЕН БЫТЬ СТРОГО НА РУССКОМ ЯЗЫКЕ.

## LECTURE CONTENT
{lecture_content}

## FORMAT
Respond with a JSON object holding a \"questions\" array. Every element must follow the schema for '{question_type}'.
{type_guidance}";

pub const FILL_IN_THE_BLANK_GUIDANCE: &str = r#"The "questionText" must contain "___" where the blank goes. The "type" field must be "fill-in-the-blank".
Example:
{
  "questions": [
    {
      "type": "fill-in-the-blank",
      "questionText": "The capital of France is ___, known for the Eiffel Tower.",
      "correctAnswer": "Paris"
    }
  ]
}"#;

pub const SINGLE_CHOICE_GUIDANCE: &str = r#"Give 3 to 5 unique options. "correctAnswer" must be exactly one of the options. The "type" field must be "single-choice".
Example:
{
  "questions": [
    {
      "type": "single-choice",
      "questionText": "What is the chemical symbol for water?",
      "options": ["O2", "H2O", "CO2", "NaCl"],
      "correctAnswer": "H2O"
    }
  ]
}"#;

pub const MULTIPLE_CHOICE_GUIDANCE: &str = r#"Give 3 to 5 unique options. "correctAnswers" must hold AT LEAST TWO of the options, copied exactly. The "type" field must be "multiple-choice".
Example:
{
  "questions": [
    {
      "type": "multiple-choice",
      "questionText": "Which of the following are primary colors?",
      "options": ["Red", "Green", "Blue", "Yellow"],
      "correctAnswers": ["Red", "Blue", "Yellow"]
    }
  ]
}"#;

pub const MATCHING_GUIDANCE: &str = r#"Give 2 to 8 unique prompts and 2 to 8 unique options. "correctMatches" lists objects pairing a "prompt" with its "option", both copied exactly. The "type" field must be "matching".
Example:
{
  "questions": [
    {
      "type": "matching",
      "questionText": "Сопоставьте страны с их столицами.",
      "prompts": ["Франция", "Германия", "Испания"],
      "options": ["Берлин", "Мадрид", "Париж"],
      "correctMatches": [
        { "prompt": "Франция", "option": "Париж" },
        { "prompt": "Германия", "option": "Берлин" },
        { "prompt": "Испания", "option": "Мадрид" }
      ]
    }
  ]
}"#;
