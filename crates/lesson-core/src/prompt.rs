//! Instruction text sent to the model.

use crate::plan::{keys, LessonPlan};

/// Baseline system instruction shared by the primary, fallback and repair calls.
pub fn system_instruction() -> String {
    format!(
        "あなたは小学校国語科の授業づくりに精通した指導案作成の専門家です。\n\
         ユーザーの要望に沿って単元の指導案を作成し、JSONオブジェクトのみを出力してください。\n\
         \n\
         # 出力するキー\n\
         「{textbook}」「{grade}」「{genre}」「{material}」「{unit}」「{hours}」「{goal}」\
         「{eval}」「{disposition}」「{flow}」「{activities}」「{result}」\n\
         \n\
         # ルール\n\
         - 「{grade}」は「1年」から「6年」のいずれかにする。\n\
         - 「{material}」と「{unit}」には同じ教材名を入れる。\n\
         - 「{hours}」は整数。要望に授業時間数があればその値に従う。\n\
         - 「{goal}」は1〜3文で書く。\n\
         - 「{eval}」は「{k}」「{t}」「{a}」の3つのキーだけを持ち、\
         それぞれ子どもの具体的な姿を短い文の配列で書く。\n\
         - 「{flow}」には「1時間目」から「N時間目」（N＝{hours}）までのキーをすべて、欠けることなく含める。\
         出力形式で「{flow}」が配列と指定されたときは、1時間目から順に各時間の文章を並べる。\n\
         - 各時間の値は120〜200字程度のひとつながりの文章にする。見出しや箇条書きにせず、\
         教師の働きかけ、子どもの学習活動、評価の視点が自然に読み取れるように書く。\n\
         - 「{activities}」には言語活動を設計するうえでの工夫を書く。",
        textbook = keys::TEXTBOOK,
        grade = keys::GRADE,
        genre = keys::GENRE,
        material = keys::MATERIAL,
        unit = keys::UNIT_NAME,
        hours = keys::HOURS,
        goal = keys::UNIT_GOAL,
        eval = keys::EVALUATION,
        disposition = keys::DISPOSITION,
        flow = keys::FLOW,
        activities = keys::LANGUAGE_ACTIVITIES,
        result = keys::RESULT,
        k = keys::EVAL_KNOWLEDGE,
        t = keys::EVAL_THINKING,
        a = keys::EVAL_ATTITUDE,
    )
}

/// System instruction for the repair call: the baseline rules plus a
/// restriction to the missing flow keys.
pub fn repair_instruction(missing: &[String]) -> String {
    format!(
        "{base}\n\
         \n\
         # 補完の指示\n\
         渡される指導案JSONの「{flow}」には未記入の時間があります。\n\
         次のキーだけを新たに書いてください：{list}\n\
         すでに文章が入っている時間は一字も変更しないでください。\n\
         出力は指導案全体のJSONオブジェクトとし、「{flow}」に上記のキーを必ず含めてください。",
        base = system_instruction(),
        flow = keys::FLOW,
        list = missing.join("、"),
    )
}

/// User message for the repair call: the current document, the original
/// request, and the keys to fill.
pub fn repair_user_message(plan: &LessonPlan, prompt: &str, missing: &[String]) -> String {
    let document = serde_json::to_string_pretty(plan).unwrap_or_else(|_| "{}".to_string());
    format!(
        "# 現在の指導案\n{document}\n\n# 元の要望\n{prompt}\n\n# 補完が必要なキー\n{list}",
        list = missing.join("\n"),
    )
}
