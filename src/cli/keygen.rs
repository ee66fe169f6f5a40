use crate::algorithm::Algorithm;
use rand::RngCore;
use serde::Serialize;

/// Freshly generated key and IV for one algorithm
#[derive(Debug, Clone, Serialize)]
pub struct KeyMaterial {
    pub algorithm: Algorithm,
    #[serde(with = "hex")]
    pub key: Vec<u8>,
    #[serde(with = "hex")]
    pub iv: Vec<u8>,
}

/// Fill a key and IV of the lengths `algorithm` expects from `rng`
/// With `with_iv` false the IV is empty, which only Rabbit accepts
pub fn generate_key_material<R: RngCore + ?Sized>(
    algorithm: Algorithm,
    with_iv: bool,
    rng: &mut R,
) -> KeyMaterial {
    let mut key = vec![0u8; algorithm.key_len()];
    rng.fill_bytes(&mut key);

    let mut iv = vec![0u8; if with_iv { algorithm.iv_len() } else { 0 }];
    rng.fill_bytes(&mut iv);

    KeyMaterial { algorithm, key, iv }
}

pub fn show_key_material(material: &KeyMaterial) -> String {
    let mut output = String::new();
    output.push_str(&format!("algorithm: {}\n", material.algorithm));
    output.push_str(&format!("key: {}\n", hex::encode(&material.key)));
    if material.iv.is_empty() {
        output.push_str("iv: none\n");
    } else {
        output.push_str(&format!("iv: {}\n", hex::encode(&material.iv)));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_lengths_match_algorithm() {
        let mut rng = StdRng::seed_from_u64(7);
        for algorithm in Algorithm::ALL {
            let material = generate_key_material(algorithm, true, &mut rng);
            assert_eq!(material.key.len(), algorithm.key_len());
            assert_eq!(material.iv.len(), algorithm.iv_len());
            assert!(algorithm.new_cipher(&material.key, &material.iv).is_ok());
        }
    }

    #[test]
    fn test_rabbit_without_iv() {
        let mut rng = StdRng::seed_from_u64(1);
        let material = generate_key_material(Algorithm::Rabbit, false, &mut rng);
        assert!(material.iv.is_empty());
        assert!(show_key_material(&material).contains("iv: none"));
    }

    #[test]
    fn test_json_is_hex() {
        let material = KeyMaterial {
            algorithm: Algorithm::Rabbit,
            key: vec![0xab; 16],
            iv: vec![0x01; 8],
        };
        let json = serde_json::to_value(&material).unwrap();
        assert_eq!(json["key"], "abababababababababababababababab");
        assert_eq!(json["iv"], "0101010101010101");
        assert_eq!(json["algorithm"], "rabbit");
    }
}
