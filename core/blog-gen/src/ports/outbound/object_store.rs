//! オブジェクトストレージ Outbound ポート
//!
//! サービス側のエラーは `Error::Aws { code, .. }` で返し、code で判定する。

use common::domain::{BucketName, ObjectKey, Region};
use common::error::Error;

/// 自分が所有するバケットが既にある
pub const BUCKET_ALREADY_OWNED_BY_YOU: &str = "BucketAlreadyOwnedByYou";
/// 他人が所有するバケットが既にある
pub const BUCKET_ALREADY_EXISTS: &str = "BucketAlreadyExists";

pub trait ObjectStore: Send + Sync {
    /// バケットを作成する。デフォルトリージョン以外では LocationConstraint を付ける
    fn create_bucket(&self, bucket: &BucketName, region: &Region) -> Result<(), Error>;

    /// オブジェクトを書き込む
    fn put_object(&self, bucket: &BucketName, key: &ObjectKey, body: &[u8]) -> Result<(), Error>;
}
