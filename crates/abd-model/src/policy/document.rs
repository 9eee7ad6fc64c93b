use serde::{Deserialize, Serialize};

use crate::{BuildRequest, ModelError, ModelResult, POLICY_VERSION, PolicyStatement};

/// Invoking the downstream processing function.
const FUNCTION_ACTIONS: &[&str] = &["lambda:InvokeAsync", "lambda:InvokeFunction"];

/// Read-only bucket metadata.
const BUCKET_READ_ACTIONS: &[&str] = &[
    "s3:GetBucketCORS",
    "s3:GetBucketLocation",
    "s3:GetBucketLogging",
    "s3:GetBucketNotification",
    "s3:GetBucketPolicy",
    "s3:GetBucketRequestPayment",
    "s3:GetBucketTagging",
    "s3:GetBucketVersioning",
    "s3:GetBucketWebsite",
    "s3:GetLifecycleConfiguration",
    "s3:ListBucket",
];

/// Object read/write below the build's prefix.
const OBJECT_ACTIONS: &[&str] = &[
    "s3:PutObject",
    "s3:PutObjectAcl",
    "s3:GetObject",
    "s3:GetObjectAcl",
    "s3:GetObjectTorrent",
    "s3:GetObjectVersion",
    "s3:GetObjectVersionAcl",
    "s3:GetObjectVersionTorrent",
];

/// Fixed resources every build policy points at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyTarget {
    /// ARN of the one processing function the build may invoke.
    pub function_arn: String,
    /// Artifact bucket name.
    pub bucket: String,
}

/// Least-privilege authorization document for exactly one build.
///
/// Generated fresh per lease and never persisted. Serializes to the standard
/// `{"Version": ..., "Statement": [...]}` shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    #[serde(rename = "Version")]
    version: String,
    #[serde(rename = "Statement")]
    statements: Vec<PolicyStatement>,
}

impl AccessPolicy {
    /// Build the policy for one request.
    ///
    /// Statements, in order:
    /// 1. invoke `target.function_arn`;
    /// 2. bucket metadata reads on `arn:aws:s3:::<bucket>`;
    /// 3. object read/write on `arn:aws:s3:::<bucket>/ember-<ember>/<addon>/<version>/*`.
    ///
    /// Fails if the request does not validate, since its fields become path segments.
    pub fn for_build(req: &BuildRequest, target: &PolicyTarget) -> ModelResult<Self> {
        req.validate()?;
        if target.bucket.is_empty() || target.bucket.contains(['/', '*']) {
            return Err(ModelError::InvalidField {
                field: "bucket",
                reason: format!("unusable bucket name {:?}", target.bucket),
            });
        }
        if target.function_arn.is_empty() || target.function_arn.contains('*') {
            return Err(ModelError::InvalidField {
                field: "function_arn",
                reason: format!("unusable function arn {:?}", target.function_arn),
            });
        }

        let bucket_arn = format!("arn:aws:s3:::{}", target.bucket);
        let objects_arn = format!("{bucket_arn}/{}*", req.artifact_prefix());

        Ok(Self {
            version: POLICY_VERSION.to_string(),
            statements: vec![
                PolicyStatement::allow(
                    FUNCTION_ACTIONS.iter().copied(),
                    [target.function_arn.as_str()],
                ),
                PolicyStatement::allow(BUCKET_READ_ACTIONS.iter().copied(), [bucket_arn]),
                PolicyStatement::allow(OBJECT_ACTIONS.iter().copied(), [objects_arn]),
            ],
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn statements(&self) -> &[PolicyStatement] {
        &self.statements
    }

    /// All resources granted by this policy.
    pub fn resources(&self) -> impl Iterator<Item = &str> {
        self.statements
            .iter()
            .flat_map(|s| s.resource.iter().map(String::as_str))
    }

    /// Encode as the JSON document handed to the credential issuer.
    pub fn to_json(&self) -> ModelResult<String> {
        serde_json::to_string(self).map_err(|e| ModelError::Encode(e.to_string()))
    }
}
