//! Golden test vectors.
//!
//! Key vectors pin seeded key derivation to the values existing TallyLab
//! accounts were created with. Manifest vectors pin the address chain for a
//! resource guarded by one writer.

use tallylab_iam_access::{controller_address, params_address, resource_address, AccessPolicy};
use tallylab_iam_core::{to_byte_list, KeyMaterial, Multibase};

/// Expected key material for a seed.
#[derive(Debug, Clone)]
pub struct KeyVector {
    pub name: &'static str,
    /// 32-character seed string.
    pub seed: &'static str,
    pub encryption_public_key: &'static str,
    pub encryption_private_key: &'static str,
    pub signing_public_key: &'static str,
}

impl KeyVector {
    /// Expected signing secret: seed bytes followed by the public key.
    pub fn signing_private_key(&self) -> String {
        format!("{},{}", to_byte_list(self.seed.as_bytes()), self.signing_public_key)
    }
}

/// All key derivation vectors.
pub fn key_vectors() -> Vec<KeyVector> {
    vec![
        KeyVector {
            name: "thirty-two characters",
            seed: "thisisexactlythirtytwocharacters",
            encryption_public_key: "196,6,185,18,253,10,139,84,248,51,221,118,178,67,198,54,240,69,252,14,209,185,54,18,133,11,125,130,46,86,69,81",
            encryption_private_key: "32,196,135,206,166,39,190,242,200,133,233,237,195,140,106,215,158,170,95,67,254,186,199,178,105,190,107,61,180,218,175,167",
            signing_public_key: "203,57,32,160,244,50,95,92,194,226,114,226,82,141,243,249,184,46,65,165,102,65,137,254,205,255,177,173,246,143,229,170",
        },
        KeyVector {
            name: "all x",
            seed: "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx",
            encryption_public_key: "156,37,248,171,221,249,107,216,132,145,204,33,21,40,243,66,159,46,136,134,113,47,1,248,147,36,196,124,86,67,172,32",
            encryption_private_key: "134,168,109,247,140,142,251,82,176,123,150,216,90,191,248,15,98,82,224,119,212,16,238,1,19,239,81,52,17,82,181,199",
            signing_public_key: "238,49,248,60,136,167,18,25,166,252,249,190,224,218,155,194,38,32,88,143,90,21,166,20,85,83,80,77,249,100,158,92",
        },
        KeyVector {
            name: "all y",
            seed: "yyyyyyyyyyyyyyyyyyyyyyyyyyyyyyyy",
            encryption_public_key: "38,77,95,113,35,121,169,17,131,104,209,95,8,3,97,1,202,242,154,236,20,156,111,25,52,218,80,95,127,57,147,17",
            encryption_private_key: "177,27,246,150,218,33,134,3,250,250,13,89,164,141,213,227,146,203,56,167,60,181,77,0,56,238,213,54,108,45,148,103",
            signing_public_key: "71,69,209,156,102,236,145,121,250,37,9,112,86,64,158,241,105,103,182,161,167,75,253,143,122,253,82,143,89,99,6,21",
        },
        KeyVector {
            name: "all z",
            seed: "zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz",
            encryption_public_key: "36,203,195,127,249,160,217,199,142,25,152,27,181,197,155,56,70,168,12,80,42,45,246,117,242,77,134,3,208,106,117,86",
            encryption_private_key: "96,54,154,245,68,207,207,165,161,136,232,31,222,227,91,238,175,121,140,226,34,61,252,166,31,197,116,37,96,54,244,176",
            signing_public_key: "186,66,69,142,131,186,121,38,186,139,143,62,154,185,202,175,15,28,73,24,221,168,197,81,8,79,122,235,16,101,183,75",
        },
    ]
}

/// Expected addresses for a single-writer resource.
#[derive(Debug, Clone)]
pub struct ManifestVector {
    pub name: &'static str,
    pub resource_name: &'static str,
    pub writer: &'static str,
    pub resource_type: &'static str,
    /// Base32 address of the params block.
    pub params_address: &'static str,
    /// Base58btc address of the access-controller manifest.
    pub controller_address: &'static str,
    /// Base58btc address of the resource manifest.
    pub resource_address: &'static str,
}

impl ManifestVector {
    pub fn policy(&self) -> AccessPolicy {
        AccessPolicy::new(self.resource_name, [self.writer])
    }
}

/// All manifest address vectors.
pub fn manifest_vectors() -> Vec<ManifestVector> {
    vec![ManifestVector {
        name: "root keyvalue, seeded writer",
        resource_name: "root",
        writer: "203,57,32,160,244,50,95,92,194,226,114,226,82,141,243,249,184,46,65,165,102,65,137,254,205,255,177,173,246,143,229,170",
        resource_type: "keyvalue",
        params_address: "bafyreieved6ag5ci4jqeidr27nxxtdnunzhi45hrn7kl4wwekou5y7j3se",
        controller_address: "zdpuAzhfKhrPhb1VQZUAxE94m8P3Xomydf9yuJ512CH7nzdf4",
        resource_address: "zdpuAv6krzrir1i3b5SD74xtEsVate4SdZrQZTJ3CSfV2ADHg",
    }]
}

/// Check one key vector. Returns a description of the first mismatch.
pub fn check_key_vector(vector: &KeyVector) -> Result<(), String> {
    let km = KeyMaterial::derive(Some(vector.seed.as_bytes())).map_err(|e| e.to_string())?;
    let signing_secret = km.signing_private_key().map(|sk| to_byte_list(sk));

    let checks = [
        ("encryption public key", to_byte_list(km.encryption_public_key()), vector.encryption_public_key.to_string()),
        ("encryption private key", to_byte_list(km.encryption_private_key()), vector.encryption_private_key.to_string()),
        ("signing public key", km.id(), vector.signing_public_key.to_string()),
        ("signing private key", signing_secret.unwrap_or_default(), vector.signing_private_key()),
    ];
    for (field, got, want) in checks {
        if got != want {
            return Err(format!("{}: {} is {}, expected {}", vector.name, field, got, want));
        }
    }
    Ok(())
}

/// Check one manifest vector. Returns a description of the first mismatch.
pub fn check_manifest_vector(vector: &ManifestVector) -> Result<(), String> {
    let policy = vector.policy();
    let params = params_address(&policy).map_err(|e| e.to_string())?;
    let controller = controller_address(&policy).map_err(|e| e.to_string())?;
    let resource = resource_address(&policy, vector.resource_type).map_err(|e| e.to_string())?;

    let checks = [
        ("params", params.encode(Multibase::Base32Lower), vector.params_address),
        ("controller", controller.encode(Multibase::Base58Btc), vector.controller_address),
        ("resource", resource.encode(Multibase::Base58Btc), vector.resource_address),
    ];
    for (field, got, want) in checks {
        if got != want {
            return Err(format!("{}: {} address is {}, expected {}", vector.name, field, got, want));
        }
    }
    Ok(())
}

/// Check every vector, reporting `(name, passed, detail)` for each.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let keys = key_vectors().into_iter().map(|v| {
        let result = check_key_vector(&v);
        (v.name.to_string(), result.is_ok(), result.err().unwrap_or_default())
    });
    let manifests = manifest_vectors().into_iter().map(|v| {
        let result = check_manifest_vector(&v);
        (v.name.to_string(), result.is_ok(), result.err().unwrap_or_default())
    });
    keys.chain(manifests).collect()
}
