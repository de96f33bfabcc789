//! プロンプトと InvokeModel のネイティブリクエスト
//!
//! Llama 3 系のモデルにはチャットテンプレート（begin_of_text / ヘッダ / eot_id）で包んで渡す。

use crate::domain::BlogTopic;
use common::domain::ModelId;
use serde::Serialize;

const BLOG_INSTRUCTION: &str = "Write a 200-word blog post on the topic:";

/// サンプリング等の固定パラメータ（デプロイ単位で設定、リクエスト単位では変えない）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub temperature: f64,
    pub top_p: f64,
    pub max_gen_len: u32,
}

impl Default for CompletionParams {
    fn default() -> Self {
        Self {
            temperature: 0.5,
            top_p: 0.9,
            max_gen_len: 512,
        }
    }
}

/// モデルに渡す整形済みプロンプト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt(String);

impl Prompt {
    /// トピックからブログ執筆の指示文を作る（トピックは加工しない）
    pub fn instruction(topic: &BlogTopic) -> String {
        format!("{} {}", BLOG_INSTRUCTION, &**topic)
    }

    /// モデルに合わせたテンプレートで包む
    pub fn for_model(model_id: &ModelId, topic: &BlogTopic) -> Self {
        let instruction = Self::instruction(topic);
        if model_id.contains("llama3") {
            Self(format!(
                "<|begin_of_text|><|start_header_id|>user<|end_header_id|>\n\n{}<|eot_id|>\n<|start_header_id|>assistant<|end_header_id|>\n\n",
                instruction
            ))
        } else {
            Self(instruction)
        }
    }
}

impl std::ops::Deref for Prompt {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Meta Llama 向け InvokeModel のリクエストボディ
#[derive(Debug, Clone, Serialize)]
pub struct NativeRequest<'a> {
    pub prompt: &'a str,
    pub temperature: f64,
    pub top_p: f64,
    pub max_gen_len: u32,
}

impl<'a> NativeRequest<'a> {
    pub fn new(prompt: &'a Prompt, params: &CompletionParams) -> Self {
        Self {
            prompt: &**prompt,
            temperature: params.temperature,
            top_p: params.top_p,
            max_gen_len: params.max_gen_len,
        }
    }
}
